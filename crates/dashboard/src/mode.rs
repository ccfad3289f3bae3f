//! Display mode cycling

/// Which field group the panel shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Basic,
    Advanced,
    Diagnostics,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Basic,
        DisplayMode::Advanced,
        DisplayMode::Diagnostics,
    ];

    /// Next mode in the button cycle
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Basic => DisplayMode::Advanced,
            DisplayMode::Advanced => DisplayMode::Diagnostics,
            DisplayMode::Diagnostics => DisplayMode::Basic,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DisplayMode::Basic => "Basic",
            DisplayMode::Advanced => "Advanced",
            DisplayMode::Diagnostics => "Diagnostics",
        }
    }

    /// 1-based page number for the header
    pub fn page(self) -> usize {
        Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0) + 1
    }
}

/// Posted by button sources, consumed on the next panel refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_presses_return_to_basic() {
        let mut mode = DisplayMode::default();
        assert_eq!(mode, DisplayMode::Basic);
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, DisplayMode::Basic);
    }

    #[test]
    fn test_cycle_order() {
        assert_eq!(DisplayMode::Basic.next(), DisplayMode::Advanced);
        assert_eq!(DisplayMode::Advanced.next(), DisplayMode::Diagnostics);
        assert_eq!(DisplayMode::Diagnostics.page(), 3);
    }
}
