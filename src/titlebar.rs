//! Native title bar theming (Windows only; a no-op elsewhere)

/// Ask DWM to draw the title bar dark or light. Returns false while the
/// window handle is not available yet, so the caller retries next frame.
#[cfg(windows)]
pub fn try_set_dark(frame: &eframe::Frame, dark: bool) -> bool {
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use std::ffi::c_void;
    use windows_sys::Win32::Graphics::Dwm::{DWMWA_USE_IMMERSIVE_DARK_MODE, DwmSetWindowAttribute};

    let opt = frame.window_handle().ok();
    let handle = match opt.as_ref() {
        Some(h) => h.as_ref(),
        None => return false,
    };
    let hwnd: isize = match handle {
        RawWindowHandle::Win32(w) => w.hwnd.get(),
        _ => return false,
    };
    if hwnd == 0 {
        return false;
    }
    let value: i32 = dark.into();
    let hr = unsafe {
        DwmSetWindowAttribute(
            hwnd as *mut c_void,
            DWMWA_USE_IMMERSIVE_DARK_MODE as _,
            &value as *const i32 as *const c_void,
            std::mem::size_of::<i32>() as u32,
        )
    };
    if hr < 0 {
        log::debug!("DwmSetWindowAttribute failed: {hr:#x}");
    }
    // Older builds reject the attribute; nothing more to try there.
    true
}

#[cfg(not(windows))]
pub fn try_set_dark(_frame: &eframe::Frame, _dark: bool) -> bool {
    true
}
