//! Display modes and the opaque creation parameters
//!
//! [`DisplayMode`] is an immutable value. [`PixelFormat`] and [`ContextAttribs`]
//! are only ever translated into native window hints; this crate never
//! interprets them beyond that.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::backend::{ContextProfile, WindowHint};

/// An immutable display mode
///
/// Modes obtained from the native video-mode list are fullscreen capable;
/// modes built by the client with [`DisplayMode::new`] are windowed only.
/// Equality and hashing cover size, depth and refresh rate but not capability.
#[derive(Debug, Clone, Copy)]
pub struct DisplayMode {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
    frequency: u32,
    fullscreen_capable: bool,
}

impl PartialEq for DisplayMode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for DisplayMode {}

impl Hash for DisplayMode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl DisplayMode {
    const fn key(&self) -> (u32, u32, u32, u32) {
        (self.width, self.height, self.bits_per_pixel, self.frequency)
    }

    /// A windowed-only mode of the given size
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 0,
            frequency: 0,
            fullscreen_capable: false,
        }
    }

    /// A fullscreen-capable mode as reported by the native video-mode list
    pub const fn native(width: u32, height: u32, bits_per_pixel: u32, frequency: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            frequency,
            fullscreen_capable: true,
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Colour depth in bits per pixel, 0 when unspecified
    pub const fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    /// Refresh rate in Hz, 0 when unspecified
    pub const fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Whether this mode may be used for a monitor-bound window
    pub const fn is_fullscreen_capable(&self) -> bool {
        self.fullscreen_capable
    }

    /// Whether switching from `previous` to `self` alters native pixel-format attributes
    ///
    /// Only size may change without affecting attributes.
    pub fn attribute_change(&self, previous: &Self) -> bool {
        self.bits_per_pixel != previous.bits_per_pixel
            || self.frequency != previous.frequency
            || self.fullscreen_capable != previous.fullscreen_capable
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {} @{}Hz",
            self.width, self.height, self.bits_per_pixel, self.frequency
        )
    }
}

/// Framebuffer format requested at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat {
    /// Bits per pixel of the colour buffer, 0 for the native default
    pub bits_per_pixel: u32,
    /// Alpha bits
    pub alpha: u32,
    /// Depth buffer bits
    pub depth: u32,
    /// Stencil buffer bits
    pub stencil: u32,
    /// Multisample count
    pub samples: u32,
    /// Auxiliary buffer count
    pub aux_buffers: u32,
    /// Accumulation buffer bits per pixel
    pub accumulation_bits_per_pixel: u32,
    /// Accumulation buffer alpha bits
    pub accumulation_alpha: u32,
    /// Stereo rendering
    pub stereo: bool,
    /// sRGB-capable framebuffer
    pub srgb: bool,
}

impl PixelFormat {
    /// The default format used when the client does not supply one (8 depth bits)
    pub const fn new() -> Self {
        Self {
            bits_per_pixel: 0,
            alpha: 0,
            depth: 8,
            stencil: 0,
            samples: 0,
            aux_buffers: 0,
            accumulation_bits_per_pixel: 0,
            accumulation_alpha: 0,
            stereo: false,
            srgb: false,
        }
    }

    /// Set alpha bits
    pub const fn with_alpha_bits(mut self, bits: u32) -> Self {
        self.alpha = bits;
        self
    }

    /// Set depth bits
    pub const fn with_depth_bits(mut self, bits: u32) -> Self {
        self.depth = bits;
        self
    }

    /// Set stencil bits
    pub const fn with_stencil_bits(mut self, bits: u32) -> Self {
        self.stencil = bits;
        self
    }

    /// Set the multisample count
    pub const fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    /// Set the auxiliary buffer count
    pub const fn with_aux_buffers(mut self, count: u32) -> Self {
        self.aux_buffers = count;
        self
    }

    /// Set accumulation buffer bits
    pub const fn with_accumulation_bits(mut self, bits_per_pixel: u32, alpha: u32) -> Self {
        self.accumulation_bits_per_pixel = bits_per_pixel;
        self.accumulation_alpha = alpha;
        self
    }

    /// Request an sRGB-capable framebuffer
    pub const fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// Native hints for this format, in application order
    pub fn window_hints(&self) -> Vec<WindowHint> {
        vec![
            WindowHint::Accumulation {
                color: self.accumulation_bits_per_pixel.saturating_sub(self.accumulation_alpha) / 3,
                alpha: self.accumulation_alpha,
            },
            WindowHint::AlphaBits(self.alpha),
            WindowHint::AuxBuffers(self.aux_buffers),
            WindowHint::DepthBits(self.depth),
            WindowHint::Samples(self.samples),
            WindowHint::StencilBits(self.stencil),
            WindowHint::Stereo(self.stereo),
            WindowHint::SrgbCapable(self.srgb),
        ]
    }
}

bitflags! {
    /// Context creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContextFlags: u32 {
        /// Debug context
        const DEBUG = 0x0001;
        /// Forward-compatible context (deprecated functionality removed)
        const FORWARD_COMPATIBLE = 0x0002;
        /// Robust buffer access
        const ROBUST_ACCESS = 0x0004;
        /// Reset isolation
        const RESET_ISOLATION = 0x0008;
    }
}

/// Profile selected by a [`ContextAttribs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileMask {
    /// No explicit profile
    #[default]
    None,
    /// Core profile
    Core,
    /// Compatibility profile
    Compatibility,
    /// Embedded-systems profile
    Es,
}

/// Requested context version, profile and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextAttribs {
    major_version: u32,
    minor_version: u32,
    profile: ProfileMask,
    flags: ContextFlags,
}

impl Default for ContextAttribs {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl ContextAttribs {
    /// Request a context of at least the given version
    pub const fn new(major_version: u32, minor_version: u32) -> Self {
        Self {
            major_version,
            minor_version,
            profile: ProfileMask::None,
            flags: ContextFlags::empty(),
        }
    }

    /// Major version
    pub const fn major_version(&self) -> u32 {
        self.major_version
    }

    /// Minor version
    pub const fn minor_version(&self) -> u32 {
        self.minor_version
    }

    /// Requested profile
    pub const fn profile(&self) -> ProfileMask {
        self.profile
    }

    /// Requested flags
    pub const fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Whether a debug context is requested
    pub const fn is_debug(&self) -> bool {
        self.flags.contains(ContextFlags::DEBUG)
    }

    /// Whether a forward-compatible context is requested
    pub const fn is_forward_compatible(&self) -> bool {
        self.flags.contains(ContextFlags::FORWARD_COMPATIBLE)
    }

    /// Whether robust access is requested
    pub const fn is_robust_access(&self) -> bool {
        self.flags.contains(ContextFlags::ROBUST_ACCESS)
    }

    /// Whether reset isolation is requested
    pub const fn is_context_reset_isolation(&self) -> bool {
        self.flags.contains(ContextFlags::RESET_ISOLATION)
    }

    /// Whether the core profile is requested
    pub fn is_profile_core(&self) -> bool {
        self.profile == ProfileMask::Core
    }

    /// Whether the compatibility profile is requested
    pub fn is_profile_compatibility(&self) -> bool {
        self.profile == ProfileMask::Compatibility
    }

    /// Whether the ES profile is requested
    pub fn is_profile_es(&self) -> bool {
        self.profile == ProfileMask::Es
    }

    /// Toggle the debug flag
    pub fn with_debug(self, debug: bool) -> Self {
        self.with_flag(ContextFlags::DEBUG, debug)
    }

    /// Toggle the forward-compatible flag
    pub fn with_forward_compatible(self, forward_compatible: bool) -> Self {
        self.with_flag(ContextFlags::FORWARD_COMPATIBLE, forward_compatible)
    }

    /// Toggle robust access
    pub fn with_robust_access(self, robust_access: bool) -> Self {
        self.with_flag(ContextFlags::ROBUST_ACCESS, robust_access)
    }

    /// Toggle reset isolation
    pub fn with_context_reset_isolation(self, isolation: bool) -> Self {
        self.with_flag(ContextFlags::RESET_ISOLATION, isolation)
    }

    /// Select or clear the core profile
    pub fn with_profile_core(self, core: bool) -> Self {
        self.with_profile(if core { ProfileMask::Core } else { ProfileMask::None })
    }

    /// Select or clear the compatibility profile
    pub fn with_profile_compatibility(self, compatibility: bool) -> Self {
        self.with_profile(if compatibility { ProfileMask::Compatibility } else { ProfileMask::None })
    }

    /// Select or clear the ES profile
    pub fn with_profile_es(self, es: bool) -> Self {
        self.with_profile(if es { ProfileMask::Es } else { ProfileMask::None })
    }

    fn with_flag(mut self, flag: ContextFlags, enable: bool) -> Self {
        self.flags.set(flag, enable);
        self
    }

    fn with_profile(mut self, profile: ProfileMask) -> Self {
        self.profile = profile;
        self
    }

    /// Native hints for these attributes
    ///
    /// Version hints are only emitted for versions other than 1.0, which
    /// means "whatever the driver offers".
    pub fn window_hints(&self) -> Vec<WindowHint> {
        let mut hints = Vec::new();
        if self.major_version != 1 || self.minor_version != 0 {
            hints.push(WindowHint::ContextVersion(self.major_version, self.minor_version));
        }
        match self.profile {
            ProfileMask::Core => hints.push(WindowHint::Profile(ContextProfile::Core)),
            ProfileMask::Compatibility => hints.push(WindowHint::Profile(ContextProfile::Compatibility)),
            ProfileMask::Es | ProfileMask::None => {}
        }
        if self.is_forward_compatible() {
            hints.push(WindowHint::ForwardCompatible(true));
        }
        if self.is_debug() {
            hints.push(WindowHint::DebugContext(true));
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_equality_is_structural() {
        assert_eq!(DisplayMode::new(800, 600), DisplayMode::new(800, 600));
        assert_ne!(DisplayMode::new(800, 600), DisplayMode::native(800, 600, 24, 60));
    }

    #[test]
    fn test_capability_ignored_by_equality_and_hash() {
        use std::collections::HashSet;

        let windowed = DisplayMode::new(800, 600);
        let native = DisplayMode::native(800, 600, 0, 0);
        assert_eq!(windowed, native);
        let set: HashSet<DisplayMode> = [windowed, native].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_size_only_change_is_not_attribute_change() {
        let a = DisplayMode::native(800, 600, 24, 60);
        let b = DisplayMode::native(1024, 768, 24, 60);
        assert!(!b.attribute_change(&a));
        assert!(DisplayMode::native(800, 600, 32, 60).attribute_change(&a));
        assert!(DisplayMode::native(800, 600, 24, 144).attribute_change(&a));
        assert!(DisplayMode::new(800, 600).attribute_change(&a));
    }

    #[test]
    fn test_client_modes_are_windowed_only() {
        assert!(!DisplayMode::new(640, 480).is_fullscreen_capable());
        assert!(DisplayMode::native(640, 480, 24, 60).is_fullscreen_capable());
    }

    #[test]
    fn test_default_context_emits_no_version_hint() {
        assert!(ContextAttribs::default().window_hints().is_empty());
    }

    #[test]
    fn test_core_forward_compatible_hints() {
        let attribs = ContextAttribs::new(3, 2)
            .with_profile_core(true)
            .with_forward_compatible(true);
        assert_eq!(
            attribs.window_hints(),
            vec![
                WindowHint::ContextVersion(3, 2),
                WindowHint::Profile(ContextProfile::Core),
                WindowHint::ForwardCompatible(true),
            ]
        );
    }

    #[test]
    fn test_flag_builders_toggle() {
        let attribs = ContextAttribs::default().with_debug(true).with_robust_access(true);
        assert!(attribs.is_debug());
        assert!(attribs.is_robust_access());
        let attribs = attribs.with_debug(false);
        assert!(!attribs.is_debug());
        assert_eq!(attribs.flags(), ContextFlags::ROBUST_ACCESS);
    }

    #[test]
    fn test_profile_builders_replace_each_other() {
        let attribs = ContextAttribs::new(3, 3).with_profile_core(true).with_profile_compatibility(true);
        assert!(attribs.is_profile_compatibility());
        assert!(!attribs.is_profile_core());
        assert_eq!(attribs.with_profile_compatibility(false).profile(), ProfileMask::None);
    }

    #[test]
    fn test_pixel_format_hints_carry_values() {
        let hints = PixelFormat::new().with_samples(4).with_stencil_bits(8).window_hints();
        assert!(hints.contains(&WindowHint::Samples(4)));
        assert!(hints.contains(&WindowHint::StencilBits(8)));
        assert!(hints.contains(&WindowHint::DepthBits(8)));
    }
}
