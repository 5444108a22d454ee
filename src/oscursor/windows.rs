//! Win32 backend. A plain top-level window gives the console process a message
//! queue to pump; cursor and buttons are polled globally.

use super::{Flow, MouseInput, MouseState};
use anyhow::{bail, Result};
use std::time::Duration;
use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_LBUTTON, VK_RBUTTON,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetCursorPos, IsWindow,
    MessageBoxW, PeekMessageW, PostQuitMessage, RegisterClassW, ShowWindow, TranslateMessage,
    CW_USEDEFAULT, MB_ICONERROR, MB_OK, MSG, PM_REMOVE, SW_SHOW, WM_DESTROY, WM_QUIT, WNDCLASSW,
    WS_OVERLAPPEDWINDOW,
};

const CLASS_NAME: &str = "MouseGXWindow";
const WINDOW_TITLE: &str = "Mouse Button Test";
const WINDOW_WIDTH: i32 = 400;
const WINDOW_HEIGHT: i32 = 300;

/// High bit of `GetAsyncKeyState`: key is currently down.
const KEY_DOWN: u16 = 0x8000;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_DESTROY {
        PostQuitMessage(0);
        return 0;
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

fn button_down(vk: VIRTUAL_KEY) -> bool {
    let state = unsafe { GetAsyncKeyState(i32::from(vk)) };
    state as u16 & KEY_DOWN != 0
}

pub struct WinMouse {
    hwnd: HWND,
    interval: Duration,
}

impl WinMouse {
    pub fn new(interval: Duration) -> Self {
        Self { hwnd: 0, interval }
    }
}

impl MouseInput for WinMouse {
    fn init(&mut self) -> Result<()> {
        let class_name = wide(CLASS_NAME);
        let title = wide(WINDOW_TITLE);
        unsafe {
            let instance = GetModuleHandleW(std::ptr::null());
            let mut wc: WNDCLASSW = std::mem::zeroed();
            wc.lpfnWndProc = Some(wnd_proc);
            wc.hInstance = instance;
            wc.lpszClassName = class_name.as_ptr();
            if RegisterClassW(&wc) == 0 {
                log::debug!(
                    "RegisterClassW failed: {}",
                    std::io::Error::last_os_error()
                );
            }

            let hwnd = CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                WINDOW_WIDTH,
                WINDOW_HEIGHT,
                0,
                0,
                instance,
                std::ptr::null(),
            );
            if hwnd == 0 {
                let err = std::io::Error::last_os_error();
                let text = wide("Failed to create the window.");
                let caption = wide("Error");
                MessageBoxW(0, text.as_ptr(), caption.as_ptr(), MB_OK | MB_ICONERROR);
                bail!("failed to create input window: {err}");
            }

            ShowWindow(hwnd, SW_SHOW);
            self.hwnd = hwnd;
        }
        log::debug!("input window created, polling every {:?}", self.interval);
        Ok(())
    }

    fn pump(&mut self) -> Flow {
        let mut msg: MSG = unsafe { std::mem::zeroed() };
        while unsafe { PeekMessageW(&mut msg, 0, 0, 0, PM_REMOVE) } != 0 {
            if msg.message == WM_QUIT {
                log::debug!("WM_QUIT received");
                return Flow::Exit;
            }
            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        Flow::Continue
    }

    fn query(&mut self) -> MouseState {
        let mut pt = POINT { x: 0, y: 0 };
        let pos = (unsafe { GetCursorPos(&mut pt) } != 0).then_some((pt.x, pt.y));
        MouseState::from_cursor(pos, button_down(VK_LBUTTON), button_down(VK_RBUTTON))
    }

    fn idle(&mut self) -> Flow {
        std::thread::sleep(self.interval);
        Flow::Continue
    }
}

impl Drop for WinMouse {
    fn drop(&mut self) {
        if self.hwnd != 0 && unsafe { IsWindow(self.hwnd) } != 0 {
            unsafe { DestroyWindow(self.hwnd) };
        }
    }
}
