mod dashboard;
mod home;
mod login;
mod profile;
mod register;

pub use dashboard::Dashboard;
pub use home::{HomePage, NotFoundPage};
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
