/// Number of pockets on a single-zero wheel (0 through 36).
pub const WHEEL_SLOTS: u8 = 37;

/// Highest number on the wheel.
pub const MAX_NUMBER: u8 = 36;

/// Red numbers on a standard European wheel.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Gross payout factor for a straight-up number bet (stake included).
pub const NUMBER_PAYOUT: f64 = 36.0;

/// Gross payout factor for color, parity and range bets (stake included).
pub const EVEN_MONEY_PAYOUT: f64 = 2.0;

/// Last number of the low range (1-18). The high range is 19-36.
pub const LOW_RANGE_MAX: u8 = 18;

/// Default table minimum stake.
pub const DEFAULT_TABLE_MIN: f64 = 1.0;

/// Default table maximum stake.
pub const DEFAULT_TABLE_MAX: f64 = 500.0;
