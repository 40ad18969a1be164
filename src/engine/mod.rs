mod assembler;
mod export_engine;
#[cfg(test)]
mod tests;

pub use assembler::ExportAssembler;
pub use export_engine::ExportEngine;
