pub(crate) mod card;
pub(crate) mod cpu;
pub(crate) mod frame;
