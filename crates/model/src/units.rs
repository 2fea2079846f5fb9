use sysmon_core::MemoryUnit;

/// Scale a byte count to the largest unit whose size does not exceed it.
///
/// Anything below 1 KB stays in bytes; a count equal to a unit's size selects
/// that unit (`1024` → `(1.0, KB)`). PB has no upper bound.
pub fn convert_to_largest_unit(bytes: u64) -> (f64, MemoryUnit) {
    let unit = MemoryUnit::ALL
        .iter()
        .rev()
        .copied()
        .find(|unit| bytes >= unit.bytes())
        .unwrap_or(MemoryUnit::B);
    (scale_to(bytes, unit), unit)
}

/// Express `bytes` in `unit`.
pub fn scale_to(bytes: u64, unit: MemoryUnit) -> f64 {
    bytes as f64 / unit.bytes() as f64
}
