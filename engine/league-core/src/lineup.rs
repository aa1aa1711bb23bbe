//! Fantasy platform lineup slot catalogue

pub const CATCHER_SLOT: u32 = 0;
pub const FIRST_BASE_SLOT: u32 = 1;
pub const SECOND_BASE_SLOT: u32 = 2;
pub const THIRD_BASE_SLOT: u32 = 3;
pub const SHORTSTOP_SLOT: u32 = 4;
pub const OUTFIELD_SLOT: u32 = 5;
pub const MIDDLE_INFIELD_SLOT: u32 = 6;
pub const CORNER_INFIELD_SLOT: u32 = 7;
pub const DESIGNATED_HITTER_SLOT: u32 = 11;
pub const UTILITY_SLOT: u32 = 12;
pub const PITCHER_SLOT: u32 = 13;
pub const STARTING_PITCHER_SLOT: u32 = 14;
pub const RELIEF_PITCHER_SLOT: u32 = 15;
pub const BENCH_SLOT: u32 = 16;
pub const INJURED_LIST_SLOT: u32 = 17;
pub const INFIELD_SLOT: u32 = 19;

/// Bench and injured-list slots never count toward team totals
pub fn is_starting_slot(slot_id: u32) -> bool {
    slot_id != BENCH_SLOT && slot_id != INJURED_LIST_SLOT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_slots() {
        assert!(!is_starting_slot(BENCH_SLOT));
        assert!(!is_starting_slot(INJURED_LIST_SLOT));
        assert!(is_starting_slot(UTILITY_SLOT));
        assert!(is_starting_slot(STARTING_PITCHER_SLOT));
    }
}
