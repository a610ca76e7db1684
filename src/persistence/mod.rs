pub mod archive;
pub mod files;
pub mod store;

pub use archive::{export_data, import_data};
pub use files::{
    atomic_write, dashboard_file, ensure_gridpad_dir, get_gridpad_dir, import_ringtone,
    init_local_gridpad, remove_ringtone, ringtone_path,
};
pub use store::{load_dashboard, save_dashboard, ClockRecord, Dashboard};
