//! Digit model
//!
//! Six positions, one panel each. A position shows a value 0-9 (or nothing)
//! from the active face set; face set and value together name the image
//! resource to decode.

/// Number of physical panels
pub const PANEL_COUNT: usize = 6;

/// Highest face set whose file indices all fit in a `u8` (24 * 10 + 9 = 249)
pub const MAX_FACE_SET: u8 = 24;

/// One physical panel, 0..=5
///
/// The numbering follows the board wiring and indexes the chip-select
/// tables in [`crate::config::ChipSelectConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelIndex(u8);

impl PanelIndex {
    /// Create a panel index; `None` if out of range
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < PANEL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Index for table lookups
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// All panels in wiring order
    pub fn all() -> impl Iterator<Item = PanelIndex> {
        (0..PANEL_COUNT as u8).map(PanelIndex)
    }
}

/// Logical digit position on the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DigitPosition {
    SecondsOnes = 0,
    SecondsTens = 1,
    MinutesOnes = 2,
    MinutesTens = 3,
    HoursOnes = 4,
    HoursTens = 5,
}

impl DigitPosition {
    /// All positions in render order: seconds first
    pub const ALL: [DigitPosition; PANEL_COUNT] = [
        DigitPosition::SecondsOnes,
        DigitPosition::SecondsTens,
        DigitPosition::MinutesOnes,
        DigitPosition::MinutesTens,
        DigitPosition::HoursOnes,
        DigitPosition::HoursTens,
    ];

    /// Panel showing this position
    pub const fn panel(self) -> PanelIndex {
        PanelIndex(self as u8)
    }

    /// Position shown on a panel
    pub const fn from_panel(panel: PanelIndex) -> Self {
        Self::ALL[panel.as_usize()]
    }

    /// Index into per-position tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Value shown at a position: a digit 0-9, or blanked (black panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitValue(u8);

impl DigitValue {
    const BLANK: u8 = 10;

    /// Render nothing
    pub const BLANKED: DigitValue = DigitValue(Self::BLANK);

    /// Create a digit value; `None` unless 0-9
    pub const fn new(digit: u8) -> Option<Self> {
        if digit <= 9 {
            Some(Self(digit))
        } else {
            None
        }
    }

    /// The digit, or `None` when blanked
    pub const fn digit(self) -> Option<u8> {
        if self.0 == Self::BLANK {
            None
        } else {
            Some(self.0)
        }
    }

    /// Check if this value renders nothing
    pub const fn is_blanked(self) -> bool {
        self.0 == Self::BLANK
    }

    /// The following digit, wrapping 9 to 0; blanked stays blanked
    pub const fn next(self) -> Self {
        match self.digit() {
            Some(9) => Self(0),
            Some(d) => Self(d + 1),
            None => self,
        }
    }
}

/// Family of digit images ("font"), 0..=[`MAX_FACE_SET`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceSet(u8);

impl Default for FaceSet {
    fn default() -> Self {
        Self(1)
    }
}

impl FaceSet {
    /// Create a face set; `None` if its file indices would overflow
    pub const fn new(index: u8) -> Option<Self> {
        if index <= MAX_FACE_SET {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// File index of this set's "0" image, the one checked to detect the set
    pub const fn first_file(self) -> FileIndex {
        FileIndex(self.0 * 10)
    }
}

/// Image resource number: `face_set * 10 + digit`
///
/// The unit of caching. Only constructible from a valid face set and digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileIndex(u8);

impl FileIndex {
    /// Image for a digit in a face set; `None` when blanked
    pub const fn new(face_set: FaceSet, value: DigitValue) -> Option<Self> {
        match value.digit() {
            Some(d) => Some(Self(face_set.0 * 10 + d)),
            None => None,
        }
    }

    /// Raw index, as used in the resource name
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Face set this image belongs to
    pub const fn face_set(self) -> FaceSet {
        FaceSet(self.0 / 10)
    }

    /// Digit this image shows
    pub const fn digit(self) -> DigitValue {
        DigitValue(self.0 % 10)
    }
}

/// Split a time of day into per-position values
///
/// Indexed by [`DigitPosition::index`]. With `blank_hours_zero` a leading
/// zero on the hours is blanked ("7:05" instead of "07:05").
pub fn clock_digits(
    hours: u8,
    minutes: u8,
    seconds: u8,
    blank_hours_zero: bool,
) -> [DigitValue; PANEL_COUNT] {
    let split = |n: u8| (DigitValue((n / 10) % 10), DigitValue(n % 10));
    let (h10, h1) = split(hours);
    let (m10, m1) = split(minutes);
    let (s10, s1) = split(seconds);

    let h10 = if blank_hours_zero && h10.0 == 0 {
        DigitValue::BLANKED
    } else {
        h10
    };

    let mut values = [DigitValue::BLANKED; PANEL_COUNT];
    values[DigitPosition::SecondsOnes.index()] = s1;
    values[DigitPosition::SecondsTens.index()] = s10;
    values[DigitPosition::MinutesOnes.index()] = m1;
    values[DigitPosition::MinutesTens.index()] = m10;
    values[DigitPosition::HoursOnes.index()] = h1;
    values[DigitPosition::HoursTens.index()] = h10;
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_index_range() {
        assert!(PanelIndex::new(5).is_some());
        assert!(PanelIndex::new(6).is_none());
        assert_eq!(PanelIndex::all().count(), PANEL_COUNT);
    }

    #[test]
    fn test_position_panel_bijection() {
        for (i, pos) in DigitPosition::ALL.iter().enumerate() {
            assert_eq!(pos.index(), i);
            assert_eq!(DigitPosition::from_panel(pos.panel()), *pos);
        }
        assert_eq!(DigitPosition::SecondsOnes.panel().get(), 0);
        assert_eq!(DigitPosition::HoursTens.panel().get(), 5);
    }

    #[test]
    fn test_digit_value() {
        assert_eq!(DigitValue::new(7).and_then(DigitValue::digit), Some(7));
        assert!(DigitValue::new(10).is_none());
        assert!(DigitValue::BLANKED.is_blanked());
        assert_eq!(DigitValue::BLANKED.digit(), None);
    }

    #[test]
    fn test_digit_next_wraps() {
        let nine = DigitValue::new(9).unwrap();
        assert_eq!(nine.next(), DigitValue::new(0).unwrap());
        assert_eq!(DigitValue::new(3).unwrap().next().digit(), Some(4));
        assert!(DigitValue::BLANKED.next().is_blanked());
    }

    #[test]
    fn test_file_index() {
        let set = FaceSet::new(3).unwrap();
        let idx = FileIndex::new(set, DigitValue::new(7).unwrap()).unwrap();
        assert_eq!(idx.get(), 37);
        assert_eq!(idx.face_set(), set);
        assert_eq!(idx.digit().digit(), Some(7));
        assert!(FileIndex::new(set, DigitValue::BLANKED).is_none());
        assert_eq!(set.first_file().get(), 30);
    }

    #[test]
    fn test_face_set_bounds() {
        let top = FaceSet::new(MAX_FACE_SET).unwrap();
        let idx = FileIndex::new(top, DigitValue::new(9).unwrap()).unwrap();
        assert_eq!(idx.get(), 249);
        assert!(FaceSet::new(MAX_FACE_SET + 1).is_none());
    }

    #[test]
    fn test_clock_digits() {
        let v = clock_digits(7, 45, 9, false);
        assert_eq!(v[DigitPosition::HoursTens.index()].digit(), Some(0));
        assert_eq!(v[DigitPosition::HoursOnes.index()].digit(), Some(7));
        assert_eq!(v[DigitPosition::MinutesTens.index()].digit(), Some(4));
        assert_eq!(v[DigitPosition::MinutesOnes.index()].digit(), Some(5));
        assert_eq!(v[DigitPosition::SecondsTens.index()].digit(), Some(0));
        assert_eq!(v[DigitPosition::SecondsOnes.index()].digit(), Some(9));

        let v = clock_digits(7, 45, 9, true);
        assert!(v[DigitPosition::HoursTens.index()].is_blanked());
        let v = clock_digits(17, 45, 9, true);
        assert_eq!(v[DigitPosition::HoursTens.index()].digit(), Some(1));
    }
}
