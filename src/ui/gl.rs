// OpenGL entry points for libmpv's render API, resolved the way GTK's own
// context was created: EGL first, GLX second, then the process symbol table.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::{CStr, c_char, c_void};
use std::sync::Mutex;
use tracing::warn;

#[cfg(not(target_os = "macos"))]
type GetProcFn = unsafe extern "C" fn(*const c_char) -> *mut c_void;
type GetIntegervFn = unsafe extern "C" fn(u32, *mut i32);
type ViewportFn = unsafe extern "C" fn(i32, i32, i32, i32);

const GL_FRAMEBUFFER_BINDING: u32 = 0x8CA6;

// Lookups never change once resolved; addresses are stored as integers so
// the cache is Send
static PROC_CACHE: Lazy<Mutex<HashMap<String, usize>>> = Lazy::new(|| Mutex::new(HashMap::new()));

#[cfg(not(target_os = "macos"))]
static LOADERS: Lazy<Vec<usize>> = Lazy::new(|| {
    [c"eglGetProcAddress", c"glXGetProcAddressARB"]
        .iter()
        .map(|name| unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) } as usize)
        .filter(|addr| *addr != 0)
        .collect()
});

#[cfg(target_os = "macos")]
static GL_FRAMEWORK: Lazy<usize> = Lazy::new(|| unsafe {
    libc::dlopen(
        c"/System/Library/Frameworks/OpenGL.framework/OpenGL".as_ptr(),
        libc::RTLD_LAZY,
    ) as usize
});

unsafe fn lookup(name: &CStr) -> *mut c_void {
    unsafe {
        #[cfg(not(target_os = "macos"))]
        {
            for loader in LOADERS.iter() {
                let get_proc: GetProcFn = std::mem::transmute(*loader);
                let func = get_proc(name.as_ptr());
                if !func.is_null() {
                    return func;
                }
            }
        }

        #[cfg(target_os = "macos")]
        {
            if *GL_FRAMEWORK != 0 {
                let func = libc::dlsym(*GL_FRAMEWORK as *mut c_void, name.as_ptr());
                if !func.is_null() {
                    return func;
                }
            }
        }

        libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr())
    }
}

/// Passed to `mpv_opengl_init_params`. The OpenGL context must be current.
pub unsafe extern "C" fn get_proc_address(_ctx: *mut c_void, name: *const c_char) -> *mut c_void {
    if name.is_null() {
        return std::ptr::null_mut();
    }
    let name = unsafe { CStr::from_ptr(name) };
    let key = name.to_string_lossy().into_owned();

    let Ok(mut cache) = PROC_CACHE.lock() else {
        return unsafe { lookup(name) };
    };
    if let Some(addr) = cache.get(&key) {
        return *addr as *mut c_void;
    }

    let func = unsafe { lookup(name) };
    if func.is_null() {
        warn!("Failed to get proc address for: {}", key);
    } else {
        cache.insert(key, func as usize);
    }
    func
}

/// Framebuffer GTK bound for the current GLArea render.
pub fn current_framebuffer() -> i32 {
    let func = unsafe { get_proc_address(std::ptr::null_mut(), c"glGetIntegerv".as_ptr()) };
    if func.is_null() {
        return 0;
    }
    let mut fbo = 0i32;
    unsafe {
        let get_integerv: GetIntegervFn = std::mem::transmute(func);
        get_integerv(GL_FRAMEBUFFER_BINDING, &mut fbo);
    }
    fbo
}

pub fn set_viewport(width: i32, height: i32) {
    let func = unsafe { get_proc_address(std::ptr::null_mut(), c"glViewport".as_ptr()) };
    if func.is_null() {
        return;
    }
    unsafe {
        let viewport: ViewportFn = std::mem::transmute(func);
        viewport(0, 0, width, height);
    }
}
