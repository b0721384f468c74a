// ABOUTME: Captcha rendering seam turning challenge digits into a displayable image
// ABOUTME: Implementations rasterize locally; the state machine never sees pixels
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Captcha rendering seam.

/// Renders challenge digits into something a browser can display.
pub trait CaptchaRenderer: Send + Sync {
    /// Render `digits` into a self-contained image reference, conventionally
    /// a `data:image/png;base64,...` URI.
    fn render(&self, digits: &str) -> String;
}
