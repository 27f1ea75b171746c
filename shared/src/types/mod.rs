pub mod account;
pub mod client_config;
pub mod course;
pub mod enrollment;
pub mod envelope;
pub mod login;
pub mod major;
pub mod profile;
pub mod register;
pub mod settings;

pub use self::account::{Account, Role, Student};
pub use self::client_config::{ApiConfig, ClientConfig, ConfigError, StorageConfig};
pub use self::course::Course;
pub use self::enrollment::{Enrollment, EnrollmentStatistics};
pub use self::envelope::{Envelope, OK_MESSAGE, SUCCESS_CODE};
pub use self::login::LoginRequest;
pub use self::major::Major;
pub use self::profile::UserProfile;
pub use self::register::RegisterRequest;
pub use self::settings::ChangePasswordRequest;
