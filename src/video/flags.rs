//! 窗口标志与脚本常量
//!
//! 数值直接取自 `sdl3-sys`，脚本侧拿到的整数与 SDL3 ABI 一致。

use std::ops::{BitOr, BitOrAssign};

use sdl3_sys::video::{
    SDL_WINDOW_BORDERLESS, SDL_WINDOW_FULLSCREEN, SDL_WINDOW_HIDDEN, SDL_WINDOW_RESIZABLE,
};

/// 窗口创建标志位掩码
///
/// 只命名 FULLSCREEN / RESIZABLE / HIDDEN / BORDERLESS 四个位，
/// 其余位原样透传给 `SDL_CreateWindow`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowFlags(u64);

impl WindowFlags {
    pub const NONE: Self = Self(0);
    pub const FULLSCREEN: Self = Self(SDL_WINDOW_FULLSCREEN);
    pub const HIDDEN: Self = Self(SDL_WINDOW_HIDDEN);
    pub const BORDERLESS: Self = Self(SDL_WINDOW_BORDERLESS);
    pub const RESIZABLE: Self = Self(SDL_WINDOW_RESIZABLE);

    const RECOGNIZED: u64 =
        Self::FULLSCREEN.0 | Self::HIDDEN.0 | Self::BORDERLESS.0 | Self::RESIZABLE.0;

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// 不属于已命名标志的位
    pub const fn unrecognized_bits(self) -> u64 {
        self.0 & !Self::RECOGNIZED
    }
}

impl BitOr for WindowFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WindowFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// 示例键码 (SDL_Keycode)
pub mod keycode {
    use sdl3_sys::keycode::{SDLK_A, SDLK_B, SDLK_ESCAPE, SDLK_RETURN, SDLK_SPACE};

    pub const RETURN: u32 = SDLK_RETURN;
    pub const ESCAPE: u32 = SDLK_ESCAPE;
    pub const SPACE: u32 = SDLK_SPACE;
    pub const A: u32 = SDLK_A;
    pub const B: u32 = SDLK_B;
}

/// 鼠标按键编号
pub mod mouse_button {
    use sdl3_sys::mouse::{SDL_BUTTON_LEFT, SDL_BUTTON_MIDDLE, SDL_BUTTON_RIGHT};

    pub const LEFT: u8 = SDL_BUTTON_LEFT as u8;
    pub const MIDDLE: u8 = SDL_BUTTON_MIDDLE as u8;
    pub const RIGHT: u8 = SDL_BUTTON_RIGHT as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_flags() {
        let flags = WindowFlags::RESIZABLE | WindowFlags::HIDDEN;
        assert!(flags.contains(WindowFlags::RESIZABLE));
        assert!(flags.contains(WindowFlags::HIDDEN));
        assert!(!flags.contains(WindowFlags::FULLSCREEN));
        assert_eq!(flags.bits(), 0x28);
        assert_eq!(flags.unrecognized_bits(), 0);
    }

    #[test]
    fn test_constants_match_sdl3_abi() {
        assert_eq!(WindowFlags::FULLSCREEN.bits(), 0x1);
        assert_eq!(WindowFlags::HIDDEN.bits(), 0x8);
        assert_eq!(WindowFlags::BORDERLESS.bits(), 0x10);
        assert_eq!(WindowFlags::RESIZABLE.bits(), 0x20);

        assert_eq!(keycode::RETURN, 0x0d);
        assert_eq!(keycode::ESCAPE, 0x1b);
        assert_eq!(keycode::SPACE, 0x20);
        assert_eq!((keycode::A, keycode::B), (0x61, 0x62));

        assert_eq!(
            (mouse_button::LEFT, mouse_button::MIDDLE, mouse_button::RIGHT),
            (1, 2, 3)
        );
    }

    #[test]
    fn test_unrecognized_bits_survive() {
        // SDL_WINDOW_OPENGL
        let flags = WindowFlags::from_bits(0x2) | WindowFlags::BORDERLESS;
        assert_eq!(flags.unrecognized_bits(), 0x2);
        assert_eq!(flags.bits(), 0x12);
    }

    proptest! {
        #[test]
        fn flags_pass_through_unchanged(bits in any::<u64>()) {
            let flags = WindowFlags::from_bits(bits);
            prop_assert_eq!(flags.bits(), bits);
        }
    }
}
