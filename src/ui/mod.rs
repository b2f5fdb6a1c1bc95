pub mod control_bar;
pub mod dialogs;
pub mod gl;
pub mod main_window;
pub mod video_surface;

pub use control_bar::ControlBar;
pub use main_window::MainWindow;
pub use video_surface::VideoSurface;
