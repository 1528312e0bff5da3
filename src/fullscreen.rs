/// Abstract "is fullscreen" capability the app queries and toggles
pub trait Fullscreen {
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&mut self, on: bool);

    /// Flip the state and return the new value
    fn toggle(&mut self) -> bool {
        let on = !self.is_fullscreen();
        self.set_fullscreen(on);
        on
    }
}

/// Terminal focus mode: the whole screen is given to the scene and timer
#[derive(Debug, Default, Clone, Copy)]
pub struct FocusMode {
    on: bool,
}

impl Fullscreen for FocusMode {
    fn is_fullscreen(&self) -> bool {
        self.on
    }

    fn set_fullscreen(&mut self, on: bool) {
        self.on = on;
    }
}
