pub(crate) mod coordinator;
pub(crate) mod tween;
