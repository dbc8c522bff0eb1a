pub(crate) mod pin;
pub(crate) mod scrub;
pub(crate) mod trigger;
