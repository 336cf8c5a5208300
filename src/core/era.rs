// src/core/era.rs

/// Japanese era name -> Gregorian year of era-year 1, minus one.
pub const ERA_OFFSETS: [(&str, i32); 3] = [
    ("令和", 2018),
    ("平成", 1988),
    ("昭和", 1925),
];

/// Regex alternation for the era names, in table order.
pub(crate) const ERA_ALTERNATION: &str = "令和|平成|昭和";

pub fn era_offset(era: &str) -> Option<i32> {
    ERA_OFFSETS.iter().find(|(name, _)| *name == era).map(|(_, off)| *off)
}

/// `offset + era_year`. Unknown eras and era years below 1 yield `None`.
pub fn era_to_gregorian(era: &str, era_year: i32) -> Option<i32> {
    if era_year < 1 { return None; }
    era_offset(era).map(|off| off + era_year)
}
