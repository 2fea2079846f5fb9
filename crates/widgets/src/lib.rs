pub mod cpu;
pub mod memory;
pub mod warning;

pub use cpu::CpuIndicator;
pub use memory::MemoryIndicator;
pub use warning::HighMemoryWatch;
