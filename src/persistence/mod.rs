pub mod files;
pub mod lock;
pub mod metadata;
pub mod settings;
pub mod store;

pub use files::{
    atomic_write, ensure_data_dir, ensure_dir, find_local_data_dir, get_data_dir, init_local_data_dir, meta_file,
    read_file, report_file, settings_file, user_dir,
};
pub use lock::DirLock;
pub use metadata::{load_metadata, save_metadata, AppMetadata};
pub use settings::{ensure_default_settings, load_settings, Settings};
pub use store::{
    JsonStore, Profile, ProfileRepository, ScheduleRepository, StoreError, StoreResult, TaskRepository,
};
