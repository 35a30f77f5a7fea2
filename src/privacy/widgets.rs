//! Form control state for preference pages

use super::tokens::OptionToken;
use serde::Serialize;

/// Item of a [`ComboBox`]: display label plus the token it stands for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboItem<T> {
    pub label: String,
    pub data: T,
}

impl<T: OptionToken> ComboItem<T> {
    fn new(data: T) -> Self {
        ComboItem {
            label: data.label().to_string(),
            data,
        }
    }
}

/// Ordered choice list with one current item
#[derive(Debug, Clone, PartialEq)]
pub struct ComboBox<T> {
    items: Vec<ComboItem<T>>,
    current: usize,
}

impl<T: OptionToken> ComboBox<T> {
    /// Combo box over `choices` with `initial` current.
    ///
    /// `initial` is put in front when `choices` does not hold it, so the box
    /// always has a current item.
    pub fn new(choices: &[T], initial: T) -> Self {
        let mut items: Vec<ComboItem<T>> =
            choices.iter().map(|&data| ComboItem::new(data)).collect();
        let current = match items.iter().position(|item| item.data == initial) {
            Some(index) => index,
            None => {
                items.insert(0, ComboItem::new(initial));
                0
            }
        };
        ComboBox { items, current }
    }

    pub fn items(&self) -> &[ComboItem<T>] {
        &self.items
    }

    /// Index of the item whose token is `token`
    pub fn find_data(&self, token: &str) -> Option<usize> {
        self.items.iter().position(|item| item.data.token() == token)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_data(&self) -> T {
        self.items[self.current].data
    }

    pub fn current_label(&self) -> &str {
        &self.items[self.current].label
    }

    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Select `value`; returns false if it is not one of the items
    pub fn set_current(&mut self, value: T) -> bool {
        match self.items.iter().position(|item| item.data == value) {
            Some(index) => self.set_current_index(index),
            None => false,
        }
    }

    /// Select the stored token, or `fallback` when it is not one of the items
    pub fn load(&mut self, stored: &str, fallback: usize) {
        let index = self.find_data(stored).unwrap_or(fallback);
        if !self.set_current_index(index) {
            self.current = 0;
        }
    }

    /// Rebuild item labels through `translate`
    pub fn retranslate(&mut self, translate: &dyn Fn(&str) -> String) {
        for item in &mut self.items {
            item.label = translate(item.data.label());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckBox {
    pub checked: bool,
    pub enabled: bool,
}

impl CheckBox {
    pub fn new(checked: bool) -> Self {
        CheckBox {
            checked,
            enabled: true,
        }
    }
}

impl Default for CheckBox {
    fn default() -> Self {
        CheckBox::new(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Button {
    pub enabled: bool,
}

/// Group of controls enabled or disabled together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privacy::tokens::{CookiesPolicy, DoNotTrackPolicy};

    #[test]
    fn test_find_data() {
        let combo = ComboBox::new(DoNotTrackPolicy::ALL, DoNotTrackPolicy::DoNotAllow);
        assert_eq!(combo.find_data("allow"), Some(1));
        assert_eq!(combo.find_data("always"), None);
    }

    #[test]
    fn test_load_with_fallback() {
        let mut combo = ComboBox::new(DoNotTrackPolicy::ALL, DoNotTrackPolicy::DoNotAllow);
        combo.load("doNotAllow", 2);
        assert_eq!(combo.current_data(), DoNotTrackPolicy::DoNotAllow);
        combo.load("garbage", 2);
        assert_eq!(combo.current_index(), 2);
        assert_eq!(combo.current_data(), DoNotTrackPolicy::Skip);
        combo.load("garbage", 42);
        assert_eq!(combo.current_index(), 0);
    }

    #[test]
    fn test_set_current_rejects_missing_item() {
        let mut combo = ComboBox::new(CookiesPolicy::SELECTABLE, CookiesPolicy::AcceptAll);
        assert!(combo.set_current(CookiesPolicy::ReadOnly));
        assert!(!combo.set_current(CookiesPolicy::Ignore));
        assert_eq!(combo.current_data(), CookiesPolicy::ReadOnly);
        assert!(!combo.set_current_index(3));
    }

    #[test]
    fn test_empty_choices_keep_initial_item() {
        let mut combo = ComboBox::new(&[], DoNotTrackPolicy::Allow);
        assert_eq!(combo.items().len(), 1);
        assert_eq!(combo.current_data(), DoNotTrackPolicy::Allow);
        assert_eq!(combo.current_label(), DoNotTrackPolicy::Allow.label());
        combo.load("skip", 2);
        assert_eq!(combo.current_index(), 0);
        assert_eq!(combo.current_data(), DoNotTrackPolicy::Allow);
    }

    #[test]
    fn test_initial_outside_choices_is_prepended() {
        let combo = ComboBox::new(CookiesPolicy::SELECTABLE, CookiesPolicy::Ignore);
        assert_eq!(combo.items().len(), 4);
        assert_eq!(combo.current_data(), CookiesPolicy::Ignore);
        assert_eq!(combo.find_data("acceptAll"), Some(1));
    }

    #[test]
    fn test_retranslate() {
        let mut combo = ComboBox::new(CookiesPolicy::SELECTABLE, CookiesPolicy::AcceptAll);
        combo.retranslate(&|text: &str| text.to_uppercase());
        assert_eq!(combo.current_label(), "ALWAYS");
        assert_eq!(combo.current_data(), CookiesPolicy::AcceptAll);
    }
}
