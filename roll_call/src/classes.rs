use std::collections::BTreeMap;

use log::debug;

use crate::config::RosterError;

/// The label of the class created on first run.
pub const DEFAULT_CLASS_NAME: &str = "默认班级";

/// All the classes of a teacher, and the one currently in use.
///
/// The collection always holds at least one class, and the current class
/// always names one of them.
///
/// ```
/// use roll_call::classes::Classes;
/// # use roll_call::RosterError;
///
/// let mut classes = Classes::new();
/// classes.add_class("Class 2")?;
/// classes.switch_class("Class 2")?;
/// classes.current_roster_mut().push("Anna".to_string());
///
/// assert_eq!(classes.current_roster(), ["Anna".to_string()]);
/// # Ok::<(), RosterError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Classes {
    classes: BTreeMap<String, Vec<String>>,
    current: String,
}

impl Default for Classes {
    fn default() -> Self {
        Classes::new()
    }
}

impl Classes {
    /// A collection with one empty default class.
    pub fn new() -> Classes {
        Classes::with_default_roster(Vec::new())
    }

    /// A collection with the given names as the only (default) class.
    pub fn with_default_roster(names: Vec<String>) -> Classes {
        let mut classes = BTreeMap::new();
        classes.insert(DEFAULT_CLASS_NAME.to_string(), names);
        Classes {
            classes,
            current: DEFAULT_CLASS_NAME.to_string(),
        }
    }

    /// Rebuilds a collection from persisted parts.
    ///
    /// A missing current class falls back to the first class, and a current
    /// class without a roster gets an empty one.
    pub fn from_parts(classes: BTreeMap<String, Vec<String>>, current: Option<String>) -> Classes {
        let current = current
            .or_else(|| classes.keys().next().cloned())
            .unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string());
        let mut res = Classes { classes, current };
        res.current_roster_mut();
        res
    }

    pub fn current_class(&self) -> &str {
        &self.current
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn classes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.classes
    }

    pub fn roster(&self, name: &str) -> Option<&[String]> {
        self.classes.get(name).map(|v| v.as_slice())
    }

    pub fn current_roster(&self) -> &[String] {
        self.roster(&self.current).unwrap_or(&[])
    }

    /// The current roster, created empty if the collection lost it.
    pub fn current_roster_mut(&mut self) -> &mut Vec<String> {
        self.classes.entry(self.current.clone()).or_default()
    }

    pub fn set_current_roster(&mut self, names: Vec<String>) {
        *self.current_roster_mut() = names;
    }

    pub fn add_class(&mut self, name: &str) -> Result<(), RosterError> {
        let name = checked_class_name(name)?;
        if self.classes.contains_key(name) {
            return Err(RosterError::AlreadyExists(name.to_string()));
        }
        debug!("add_class: {:?}", name);
        self.classes.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn rename_class(&mut self, old: &str, new: &str) -> Result<(), RosterError> {
        let new = checked_class_name(new)?;
        if !self.classes.contains_key(old) {
            return Err(RosterError::UnknownClass(old.to_string()));
        }
        if new == old {
            return Ok(());
        }
        if self.classes.contains_key(new) {
            return Err(RosterError::AlreadyExists(new.to_string()));
        }
        let roster = self.classes.remove(old).unwrap_or_default();
        self.classes.insert(new.to_string(), roster);
        if self.current == old {
            self.current = new.to_string();
        }
        debug!("rename_class: {:?} -> {:?}", old, new);
        Ok(())
    }

    /// Deletes a class. Deleting the current class moves the pointer to the
    /// first remaining class.
    pub fn delete_class(&mut self, name: &str) -> Result<(), RosterError> {
        if self.classes.len() <= 1 {
            return Err(RosterError::LastClass);
        }
        if self.classes.remove(name).is_none() {
            return Err(RosterError::UnknownClass(name.to_string()));
        }
        if self.current == name {
            if let Some(first) = self.classes.keys().next() {
                self.current = first.clone();
            }
        }
        debug!("delete_class: {:?}, current: {:?}", name, self.current);
        Ok(())
    }

    pub fn switch_class(&mut self, name: &str) -> Result<(), RosterError> {
        if !self.classes.contains_key(name) {
            return Err(RosterError::UnknownClass(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }
}

fn checked_class_name(name: &str) -> Result<&str, RosterError> {
    let name = name.trim();
    if name.is_empty() {
        Err(RosterError::EmptyClassName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_collection_has_default_class() {
        let classes = Classes::new();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes.current_class(), DEFAULT_CLASS_NAME);
        assert!(classes.current_roster().is_empty());
    }

    #[test]
    fn add_existing_class_fails() {
        let mut classes = Classes::new();
        classes.add_class("A").unwrap();
        assert_eq!(
            classes.add_class(" A "),
            Err(RosterError::AlreadyExists("A".to_string()))
        );
        assert_eq!(classes.add_class("   "), Err(RosterError::EmptyClassName));
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn rename_moves_roster_and_pointer() {
        let mut classes = Classes::new();
        classes.set_current_roster(names(&["Anna", "Bob"]));
        classes.rename_class(DEFAULT_CLASS_NAME, "3B").unwrap();
        assert_eq!(classes.current_class(), "3B");
        assert_eq!(classes.current_roster(), names(&["Anna", "Bob"]).as_slice());
        assert!(!classes.contains(DEFAULT_CLASS_NAME));
    }

    #[test]
    fn rename_to_same_name_is_noop() {
        let mut classes = Classes::new();
        classes.add_class("A").unwrap();
        let before = classes.clone();
        classes.rename_class("A", "A").unwrap();
        assert_eq!(classes, before);
    }

    #[test]
    fn rename_collision_fails() {
        let mut classes = Classes::new();
        classes.add_class("A").unwrap();
        assert_eq!(
            classes.rename_class("A", DEFAULT_CLASS_NAME),
            Err(RosterError::AlreadyExists(DEFAULT_CLASS_NAME.to_string()))
        );
        assert_eq!(
            classes.rename_class("Z", "Y"),
            Err(RosterError::UnknownClass("Z".to_string()))
        );
    }

    #[test]
    fn delete_last_class_fails() {
        let mut classes = Classes::new();
        assert_eq!(
            classes.delete_class(DEFAULT_CLASS_NAME),
            Err(RosterError::LastClass)
        );
        assert_eq!(classes.len(), 1);
    }

    #[test]
    fn delete_current_class_moves_pointer() {
        let mut classes = Classes::new();
        classes.add_class("B").unwrap();
        classes.add_class("A").unwrap();
        classes.switch_class("B").unwrap();
        classes.delete_class("B").unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.current_class(), "A");
        assert!(classes.contains(classes.current_class()));
    }

    #[test]
    fn delete_other_class_keeps_pointer() {
        let mut classes = Classes::new();
        classes.add_class("B").unwrap();
        classes.delete_class("B").unwrap();
        assert_eq!(classes.current_class(), DEFAULT_CLASS_NAME);
        assert_eq!(
            classes.delete_class("B"),
            Err(RosterError::LastClass)
        );
    }

    #[test]
    fn from_parts_repairs_missing_current() {
        let mut map = BTreeMap::new();
        map.insert("A".to_string(), names(&["x"]));
        let classes = Classes::from_parts(map, Some("Ghost".to_string()));
        assert_eq!(classes.current_class(), "Ghost");
        assert!(classes.contains("Ghost"));
        assert!(classes.current_roster().is_empty());

        let classes = Classes::from_parts(BTreeMap::new(), None);
        assert_eq!(classes.current_class(), DEFAULT_CLASS_NAME);
        assert_eq!(classes.len(), 1);
    }
}
