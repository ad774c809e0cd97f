//! Account commands.

use swiftthrift_storefront::Storefront;
use swiftthrift_storefront::auth::SignupForm;

use super::{CliError, out, read_secret};

pub struct SignupArgs {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
}

pub async fn login(state: &Storefront, email: &str) -> Result<(), CliError> {
    let password = read_secret("Password")?;
    let session = state.auth().login(email, &password).await?;
    out(format_args!("Logged in as {}", session.user().username))
}

pub async fn signup(state: &Storefront, args: SignupArgs) -> Result<(), CliError> {
    let password = read_secret("Password")?;
    let confirm_password = read_secret("Confirm password")?;
    let form = SignupForm {
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        username: args.username,
        password,
        confirm_password,
        phone: args.phone,
    };
    state.auth().signup(&form).await?;
    out("Account created. You can now log in.")
}

pub fn logout(state: &Storefront) -> Result<(), CliError> {
    state.auth().logout()?;
    out("Logged out")
}

pub fn whoami(state: &Storefront) -> Result<(), CliError> {
    let session = state.session()?;
    let user = session.user();
    out(format_args!(
        "{} <{}> (id {}, {})",
        user.username, user.email, user.user_id, user.role
    ))
}
