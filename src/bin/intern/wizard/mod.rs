mod login_wizard;

pub use login_wizard::run_login_wizard;
