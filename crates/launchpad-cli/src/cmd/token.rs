use anyhow::Result;
use launchpad_core::identity::sign_token_for;

pub fn run(user_id: &str, secret: &str) -> Result<()> {
    anyhow::ensure!(!user_id.is_empty(), "user id must not be empty");
    let token = sign_token_for(user_id, secret)?;
    println!("{token}");
    Ok(())
}
