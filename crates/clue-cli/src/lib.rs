pub mod logging;
pub mod lookup;
pub mod render;
pub mod replay;
pub mod script;
pub mod simulate;
