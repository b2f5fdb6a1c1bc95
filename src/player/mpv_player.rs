use libmpv2::Mpv;
use libmpv2_sys::*;
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;
use tracing::{debug, error, info, trace, warn};

use super::signals::SignalSender;
use crate::config::PlaybackConfig;
use crate::constants::{OBSERVE_DURATION, OBSERVE_TIME_POS};
use crate::core::{EndFileReason, EngineEvent, MediaEngine};
use crate::utils::PlayerError;

/// Resolver libmpv uses to look up OpenGL entry points.
pub type GetProcAddressFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> *mut c_void;

/// Owns a libmpv render context and the sender its update callback uses.
struct RenderContext {
    ctx: *mut mpv_render_context,
    // Referenced by the update callback until the context is freed
    _update_ctx: Box<SignalSender>,
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        unsafe {
            mpv_render_context_set_update_callback(self.ctx, None, ptr::null_mut());
            mpv_render_context_free(self.ctx);
        }
        debug!("Render context freed");
    }
}

/// libmpv instance rendering through the OpenGL render API.
///
/// Field order is drop order: the render context goes first, then the
/// handle, then the wakeup callback's sender.
pub struct MpvEngine {
    render: Option<RenderContext>,
    mpv: Mpv,
    wakeup_ctx: Box<SignalSender>,
}

unsafe extern "C" fn on_wakeup(ctx: *mut c_void) {
    unsafe {
        let sender = &*(ctx as *const SignalSender);
        sender.wakeup();
    }
}

unsafe extern "C" fn on_render_update(ctx: *mut c_void) {
    unsafe {
        let sender = &*(ctx as *const SignalSender);
        sender.redraw();
    }
}

fn error_text(code: c_int) -> String {
    unsafe {
        let text = mpv_error_string(code);
        if text.is_null() {
            format!("error {}", code)
        } else {
            CStr::from_ptr(text).to_string_lossy().into_owned()
        }
    }
}

impl MpvEngine {
    pub fn new(config: &PlaybackConfig, signals: SignalSender) -> Result<Self, PlayerError> {
        info!("Creating MPV instance");

        // libmpv refuses to start unless numbers parse with a '.' separator
        unsafe {
            libc::setlocale(libc::LC_NUMERIC, c"C".as_ptr());
        }

        let mpv = Mpv::new().map_err(|e| {
            error!("Failed to create MPV instance: {:?}", e);
            PlayerError::EngineCreate
        })?;

        Self::configure(&mpv, config);

        if let Ok(version) = mpv.get_property::<String>("mpv-version") {
            info!("MPV version: {}", version);
        }

        let handle = mpv.ctx.as_ptr();
        for (id, name) in [(OBSERVE_TIME_POS, c"time-pos"), (OBSERVE_DURATION, c"duration")] {
            let result =
                unsafe { mpv_observe_property(handle, id, name.as_ptr(), mpv_format_MPV_FORMAT_DOUBLE) };
            if result < 0 {
                return Err(PlayerError::EngineInit(format!(
                    "observing {:?}: {}",
                    name,
                    error_text(result)
                )));
            }
        }

        let wakeup_ctx = Box::new(signals);
        unsafe {
            mpv_set_wakeup_callback(
                handle,
                Some(on_wakeup),
                &*wakeup_ctx as *const SignalSender as *mut c_void,
            );
        }

        info!("MPV instance configured");
        Ok(Self {
            render: None,
            mpv,
            wakeup_ctx,
        })
    }

    // Option failures leave libmpv on its defaults
    fn configure(mpv: &Mpv, config: &PlaybackConfig) {
        let msg_level = if config.verbose_logging {
            "all=debug"
        } else {
            "all=warn"
        };

        let options: [(&str, &str); 10] = [
            ("terminal", if config.verbose_logging { "yes" } else { "no" }),
            ("msg-level", msg_level),
            ("vo", "libmpv"),
            ("hwdec", config.hwdec.as_str()),
            ("keepaspect", "yes"),
            ("keepaspect-window", "yes"),
            ("video-unscaled", "no"),
            ("panscan", "0"),
            ("input-default-bindings", "no"),
            ("osc", "no"),
        ];

        for (name, value) in options {
            match mpv.set_property(name, value) {
                Ok(()) => trace!("Set {}={}", name, value),
                Err(e) => warn!("Failed to set {}={}: {:?}", name, value, e),
            }
        }
    }

    fn handle(&self) -> *mut mpv_handle {
        self.mpv.ctx.as_ptr()
    }

    /// Bind libmpv to the current OpenGL context.
    ///
    /// The caller makes the surface's context current first. Redraw requests
    /// are sent through the same signal channel as wakeups.
    pub fn create_render_context(&mut self, get_proc_address: GetProcAddressFn) -> Result<(), PlayerError> {
        if self.render.is_some() {
            debug!("Render context already exists");
            return Ok(());
        }

        info!("Initializing OpenGL render context");
        let mut init_params = mpv_opengl_init_params {
            get_proc_address: Some(get_proc_address),
            get_proc_address_ctx: ptr::null_mut(),
        };
        let mut params = [
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_API_TYPE,
                data: c"opengl".as_ptr() as *mut c_void,
            },
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_OPENGL_INIT_PARAMS,
                data: &mut init_params as *mut mpv_opengl_init_params as *mut c_void,
            },
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_INVALID,
                data: ptr::null_mut(),
            },
        ];

        let mut ctx: *mut mpv_render_context = ptr::null_mut();
        let result = unsafe { mpv_render_context_create(&mut ctx, self.handle(), params.as_mut_ptr()) };
        if result < 0 || ctx.is_null() {
            return Err(PlayerError::RenderContext(error_text(result)));
        }

        let update_ctx = Box::new((*self.wakeup_ctx).clone());
        unsafe {
            mpv_render_context_set_update_callback(
                ctx,
                Some(on_render_update),
                &*update_ctx as *const SignalSender as *mut c_void,
            );
        }

        self.render = Some(RenderContext {
            ctx,
            _update_ctx: update_ctx,
        });
        info!("OpenGL render context initialized");
        Ok(())
    }

    /// Free the render context while its OpenGL context is still current.
    pub fn release_render_context(&mut self) {
        if self.render.take().is_some() {
            info!("Render context released");
        }
    }

    /// Draw the current frame into `fbo`, flipped for GL's bottom-up origin.
    pub fn render_frame(&self, fbo: i32, width: i32, height: i32) {
        let Some(render) = &self.render else {
            return;
        };

        let mut target = mpv_opengl_fbo {
            fbo,
            w: width,
            h: height,
            internal_format: 0,
        };
        let mut flip_y: c_int = 1;
        let mut params = [
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_OPENGL_FBO,
                data: &mut target as *mut mpv_opengl_fbo as *mut c_void,
            },
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_FLIP_Y,
                data: &mut flip_y as *mut c_int as *mut c_void,
            },
            mpv_render_param {
                type_: mpv_render_param_type_MPV_RENDER_PARAM_INVALID,
                data: ptr::null_mut(),
            },
        ];

        unsafe {
            let result = mpv_render_context_render(render.ctx, params.as_mut_ptr());
            if result < 0 {
                error!("mpv_render_context_render failed: {}", error_text(result));
                return;
            }
            mpv_render_context_report_swap(render.ctx);
        }
    }

    fn property_event(event: &mpv_event) -> Option<EngineEvent> {
        if event.data.is_null() {
            return None;
        }
        let property = unsafe { &*(event.data as *const mpv_event_property) };
        // Unavailable properties arrive with MPV_FORMAT_NONE and no data
        if property.format != mpv_format_MPV_FORMAT_DOUBLE || property.data.is_null() {
            return None;
        }
        let value = unsafe { *(property.data as *const f64) };

        match event.reply_userdata {
            OBSERVE_TIME_POS => Some(EngineEvent::PositionChanged(value)),
            OBSERVE_DURATION => Some(EngineEvent::DurationChanged(value)),
            _ => None,
        }
    }

    fn end_file_event(event: &mpv_event) -> EngineEvent {
        if event.data.is_null() {
            return EngineEvent::EndOfFile(EndFileReason::Stop);
        }
        let end_file = unsafe { &*(event.data as *const mpv_event_end_file) };
        let reason = end_file.reason as i64;

        let reason = if reason == mpv_end_file_reason_MPV_END_FILE_REASON_EOF as i64 {
            EndFileReason::Eof
        } else if reason == mpv_end_file_reason_MPV_END_FILE_REASON_QUIT as i64 {
            EndFileReason::Quit
        } else if reason == mpv_end_file_reason_MPV_END_FILE_REASON_ERROR as i64 {
            EndFileReason::Error
        } else if reason == mpv_end_file_reason_MPV_END_FILE_REASON_REDIRECT as i64 {
            EndFileReason::Redirect
        } else {
            EndFileReason::Stop
        };
        EngineEvent::EndOfFile(reason)
    }
}

impl MediaEngine for MpvEngine {
    fn load(&self, reference: &str) -> Result<(), PlayerError> {
        let path = CString::new(reference).map_err(|_| PlayerError::InvalidReference(reference.to_string()))?;
        let mut args: [*const c_char; 4] = [
            c"loadfile".as_ptr(),
            path.as_ptr(),
            c"replace".as_ptr(),
            ptr::null(),
        ];

        debug!("loadfile {}", reference);
        let result = unsafe { mpv_command(self.handle(), args.as_mut_ptr()) };
        if result < 0 {
            return Err(PlayerError::command("loadfile", error_text(result)));
        }
        Ok(())
    }

    fn set_paused(&self, paused: bool) -> Result<(), PlayerError> {
        self.mpv
            .set_property("pause", if paused { "yes" } else { "no" })
            .map_err(|e| PlayerError::property("pause", format!("{:?}", e)))
    }

    fn seek_absolute(&self, seconds: f64) -> Result<(), PlayerError> {
        let target = format!("{:.3}", seconds);
        self.mpv
            .command("seek", &[target.as_str(), "absolute"])
            .map_err(|e| PlayerError::command("seek", format!("{:?}", e)))
    }

    fn set_volume(&self, percent: u8) -> Result<(), PlayerError> {
        self.mpv
            .set_property("volume", percent.to_string().as_str())
            .map_err(|e| PlayerError::property("volume", format!("{:?}", e)))
    }

    fn duration(&self) -> Option<f64> {
        self.mpv.get_property::<f64>("duration").ok()
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        let handle = self.handle();
        let mut events = Vec::new();

        loop {
            let event = unsafe { &*mpv_wait_event(handle, 0.0) };
            let id = event.event_id;

            if id == mpv_event_id_MPV_EVENT_NONE {
                break;
            } else if id == mpv_event_id_MPV_EVENT_PROPERTY_CHANGE {
                events.extend(Self::property_event(event));
            } else if id == mpv_event_id_MPV_EVENT_END_FILE {
                events.push(Self::end_file_event(event));
            } else if id == mpv_event_id_MPV_EVENT_SHUTDOWN {
                events.push(EngineEvent::Shutdown);
                break;
            } else {
                trace!("Ignoring mpv event {}", id);
            }
        }

        events
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        self.release_render_context();
        unsafe {
            mpv_set_wakeup_callback(self.handle(), None, ptr::null_mut());
        }
        debug!("MPV engine dropped");
    }
}
