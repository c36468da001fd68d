//! Keypad model: digits and button items
//!
//! Rendering is left to the host. This module only fixes which buttons exist,
//! in what order, and what each one means.

use std::fmt;

/// A single decimal digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }

    /// All digits from 0 to 9
    pub fn all() -> impl Iterator<Item = Digit> {
        (0..=9).map(Digit)
    }
}

impl TryFrom<char> for Digit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10).map(|d| Digit(d as u8)).ok_or(c)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One keypad button
///
/// `Custom` carries an application-defined payload (e.g. "forgot passcode")
/// that the view-model hands back to the host untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassCodeButtonItem<C> {
    Digit(Digit),
    Backspace,
    Biometrics,
    Custom(C),
}

impl<C> PassCodeButtonItem<C> {
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(PassCodeButtonItem::Digit)
    }
}

/// Standard 3x4 keypad: 1-9, then `[leading] 0 [trailing]`
#[derive(Debug, Clone)]
pub struct Keypad<C> {
    leading: Option<PassCodeButtonItem<C>>,
    trailing: Option<PassCodeButtonItem<C>>,
}

impl<C> Default for Keypad<C> {
    fn default() -> Self {
        Self {
            leading: None,
            trailing: None,
        }
    }
}

impl<C: Clone> Keypad<C> {
    pub fn new(
        leading: Option<PassCodeButtonItem<C>>,
        trailing: Option<PassCodeButtonItem<C>>,
    ) -> Self {
        Self { leading, trailing }
    }

    pub fn set_leading(&mut self, item: Option<PassCodeButtonItem<C>>) {
        self.leading = item;
    }

    pub fn set_trailing(&mut self, item: Option<PassCodeButtonItem<C>>) {
        self.trailing = item;
    }

    /// Buttons in display order, skipping empty bottom slots
    pub fn items(&self) -> Vec<PassCodeButtonItem<C>> {
        let mut items: Vec<_> = (1..=9)
            .filter_map(PassCodeButtonItem::digit)
            .collect();
        items.extend(self.leading.clone());
        items.extend(PassCodeButtonItem::digit(0));
        items.extend(self.trailing.clone());
        items
    }

    /// Buttons as a grid of four rows, empty slots kept as `None`
    pub fn rows(&self) -> [[Option<PassCodeButtonItem<C>>; 3]; 4] {
        let digit = |value| PassCodeButtonItem::digit(value);
        [
            [digit(1), digit(2), digit(3)],
            [digit(4), digit(5), digit(6)],
            [digit(7), digit(8), digit(9)],
            [self.leading.clone(), digit(0), self.trailing.clone()],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Extra {
        ForgotPasscode,
    }

    #[test]
    fn test_digit_parsing() {
        assert_eq!(Digit::try_from('7').unwrap().value(), 7);
        assert_eq!(Digit::try_from('x'), Err('x'));
        assert!(Digit::new(10).is_none());
        assert_eq!(Digit::new(0).unwrap().as_char(), '0');
        assert_eq!(Digit::all().count(), 10);
    }

    #[test]
    fn test_default_keypad_items() {
        let keypad: Keypad<Extra> = Keypad::default();
        let items = keypad.items();

        assert_eq!(items.len(), 10);
        assert_eq!(items[0], PassCodeButtonItem::digit(1).unwrap());
        assert_eq!(items[9], PassCodeButtonItem::digit(0).unwrap());
    }

    #[test]
    fn test_keypad_with_extra_slots() {
        let keypad = Keypad::new(
            Some(PassCodeButtonItem::Custom(Extra::ForgotPasscode)),
            Some(PassCodeButtonItem::Backspace),
        );

        let items = keypad.items();
        assert_eq!(items.len(), 12);
        assert_eq!(items[9], PassCodeButtonItem::Custom(Extra::ForgotPasscode));
        assert_eq!(items[11], PassCodeButtonItem::Backspace);

        let rows = keypad.rows();
        assert_eq!(rows[3][1], PassCodeButtonItem::digit(0));
        assert_eq!(rows[3][2], Some(PassCodeButtonItem::Backspace));
    }

    #[test]
    fn test_removing_slot() {
        let mut keypad = Keypad::new(Some(PassCodeButtonItem::<Extra>::Biometrics), None);
        keypad.set_leading(None);
        assert_eq!(keypad.items().len(), 10);
        assert!(keypad.rows()[3][0].is_none());
    }
}
