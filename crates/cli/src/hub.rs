//! CorpusHub CLI glue: login and hub error → exit code mapping.
//!
//! `scriba login`   — verify and store an API token
//!
//! Save and revert calls live with the commands that drive them
//! (`session`, `panel`); the error mapping here is shared.

use scriba_hub_client::{save_auth, AuthCredentials, HubClient, HubError};

use crate::exit_codes::*;
use crate::CliError;

pub fn cmd_login(token: Option<String>, api_base: String) -> Result<(), CliError> {
    let Some(token) = token else {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "No token provided".into(),
            hint: Some("pass --token or set SCRIBA_API_TOKEN".into()),
        });
    };

    // Verify the token works before saving anything
    let creds = AuthCredentials::new(token.clone(), api_base.clone());
    let client = HubClient::new(creds);

    let user = client.verify_token().map_err(|e| match e {
        HubError::Http(401, _) | HubError::Http(403, _) => CliError {
            code: EXIT_HUB_NOT_AUTH,
            message: "Invalid API token".into(),
            hint: Some("generate a new token in your CorpusHub account settings".into()),
        },
        HubError::Network(msg) => CliError {
            code: EXIT_HUB_NETWORK,
            message: format!("Cannot reach CorpusHub: {}", msg),
            hint: None,
        },
        other => hub_error(other),
    })?;

    let creds = AuthCredentials {
        token,
        api_base,
        user: Some(user.user.clone()),
        country: Some(user.country.clone()),
    };
    save_auth(&creds).map_err(|e| CliError { code: EXIT_IO, message: e, hint: None })?;

    println!("Logged in as {} ({})", user.user, user.country);
    Ok(())
}

/// Map a hub client error to a CLI failure.
pub fn hub_error(e: HubError) -> CliError {
    match e {
        HubError::NotAuthenticated => CliError {
            code: EXIT_HUB_NOT_AUTH,
            message: e.to_string(),
            hint: Some("run `scriba login` first".into()),
        },
        HubError::Network(_) => CliError {
            code: EXIT_HUB_NETWORK,
            message: e.to_string(),
            hint: None,
        },
        HubError::Rejected(_) | HubError::Validation(_) => CliError {
            code: EXIT_HUB_REJECTED,
            message: e.to_string(),
            hint: None,
        },
        HubError::Http(401, _) | HubError::Http(403, _) => CliError {
            code: EXIT_HUB_NOT_AUTH,
            message: e.to_string(),
            hint: Some("run `scriba login` again".into()),
        },
        other => CliError { code: EXIT_ERROR, message: other.to_string(), hint: None },
    }
}

pub fn io_error(message: String) -> CliError {
    CliError { code: EXIT_IO, message, hint: None }
}
