/// Snapshot of which logical actions are currently held.  The simulation
/// never sees raw key events; the driver maps keys onto these flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub pause: bool,
    pub start: bool,
    pub restart: bool,
}

impl InputSnapshot {
    pub const NONE: InputSnapshot = InputSnapshot {
        move_left: false,
        move_right: false,
        fire: false,
        pause: false,
        start: false,
        restart: false,
    };
}
