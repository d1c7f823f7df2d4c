use chrono::NaiveTime;

pub const SLOT_COUNT: u32 = 16;

// The venue's fixed lesson grid: slot 1 runs 08:00-08:45, slot 16 runs
// 20:15-21:00, with short breaks in between. Wall-clock (hour, minute)
// pairs keyed by hour-slot index 1..=16.
#[rustfmt::skip]
const SLOT_STARTS: [(u32, u32); SLOT_COUNT as usize] = [
  (8, 0),  (8, 45),  (9, 40),  (10, 25), (11, 30), (12, 15), (13, 10),
  (13, 55), (14, 45), (15, 30), (16, 20), (17, 5),  (17, 55), (18, 40),
  (19, 30), (20, 15),
];

#[rustfmt::skip]
const SLOT_ENDS: [(u32, u32); SLOT_COUNT as usize] = [
  (8, 45), (9, 30),  (10, 25), (11, 10), (12, 15), (13, 0),  (13, 55),
  (14, 40), (15, 30), (16, 15), (17, 5),  (17, 50), (18, 40), (19, 25),
  (20, 15), (21, 0),
];

pub fn slot_start(slot: u32) -> Option<NaiveTime> {
  lookup(&SLOT_STARTS, slot)
}

pub fn slot_end(slot: u32) -> Option<NaiveTime> {
  lookup(&SLOT_ENDS, slot)
}

fn lookup(
  table: &[(u32, u32); SLOT_COUNT as usize],
  slot: u32,
) -> Option<NaiveTime> {
  if slot == 0 || slot > SLOT_COUNT {
    return None;
  }
  let (hour, minute) = table[(slot - 1) as usize];
  NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_slot_has_a_start_and_an_end() {
    for slot in 1..=SLOT_COUNT {
      assert!(slot_start(slot).is_some(), "slot {slot} has no start");
      assert!(slot_end(slot).is_some(), "slot {slot} has no end");
    }
  }

  #[test]
  fn out_of_grid_slots_have_no_times() {
    assert!(slot_start(0).is_none());
    assert!(slot_start(SLOT_COUNT + 1).is_none());
    assert!(slot_end(0).is_none());
    assert!(slot_end(SLOT_COUNT + 1).is_none());
  }

  #[test]
  fn slots_are_strictly_increasing_and_non_overlapping() {
    for slot in 1..=SLOT_COUNT {
      assert!(
        slot_start(slot).unwrap() < slot_end(slot).unwrap(),
        "slot {slot} start must precede its end"
      );
    }
    for slot in 1..SLOT_COUNT {
      assert!(
        slot_end(slot).unwrap() <= slot_start(slot + 1).unwrap(),
        "slot {slot} overlaps slot {}",
        slot + 1
      );
    }
  }

  #[test]
  fn first_slot_starts_the_teaching_day_at_eight() {
    let start = slot_start(1).unwrap();
    assert_eq!(start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    let end = slot_end(16).unwrap();
    assert_eq!(end, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
  }
}
