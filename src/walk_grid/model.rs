use std::collections::BTreeMap;

/// One scheduled occurrence of a course in one day-block at one
/// hour-slot. An occurrence never spans more than one slot, so
/// `end_slot` is always `start_slot + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOccurrence {
  pub name:       String,
  pub teacher:    String,
  pub weeks:      Vec<i32>,
  pub start_slot: u32,
  pub end_slot:   u32,
  pub locations:  Vec<String>,
}

/// Classes keyed by absolute day-of-month, in day-block order.
pub type DaySchedule = BTreeMap<u32, Vec<ClassOccurrence>>;
