use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use portal::config::PortalConfig;
use portal::domain::types::{AdminCredentials, Attachment, LoginForm, SignupForm};
use portal::error::PortalError;
use portal::state::Portal;
use portal_core::config::Config;

#[derive(Parser)]
#[command(name = "portal", about = "Student scholarship portal client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Student sign-in with an emailed one-time code.
    Login {
        #[arg(long)]
        aadhaar: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Skip the one-time code and use the federated provider.
        #[arg(long)]
        google: bool,
    },
    /// Admin sign-in by email or username.
    AdminLogin {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        password: String,
    },
    /// Register a student account.
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        dob: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        aadhaar: String,
        #[arg(long)]
        profile_pic: PathBuf,
        #[arg(long)]
        id_proof: PathBuf,
        #[arg(long)]
        academic_records: PathBuf,
    },
    /// Request a password reset email.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Show the stored profile for an account.
    Profile {
        #[arg(long)]
        user_id: String,
    },
    /// Populate the admins collection with numbered accounts.
    SeedAdmins {
        #[arg(long, default_value = "yourdomain.com")]
        domain: String,
        #[arg(long, default_value_t = 100)]
        count: u32,
    },
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("attachment path has no file name")?
        .to_owned();
    Ok(Attachment {
        file_name,
        content_type: content_type_for(path).to_owned(),
        bytes,
    })
}

/// Prompt for codes until one verifies. A mismatch or an expired code
/// keeps the challenge open; anything else ends the loop.
async fn with_otp<T>(
    mut submit: impl AsyncFnMut(String) -> Result<T, PortalError>,
) -> anyhow::Result<T> {
    loop {
        let entered = prompt("Enter the code sent to your email")?;
        match submit(entered).await {
            Ok(value) => return Ok(value),
            Err(e @ (PortalError::OtpMismatch | PortalError::Expired)) => {
                eprintln!("{e}, try again");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    portal_core::tracing::init_tracing();

    let cli = Cli::parse();
    let config = PortalConfig::from_env();
    let portal = Portal::new(&config);

    match cli.command {
        Command::Login {
            aadhaar,
            email,
            password,
            google,
        } => {
            let mut flow = portal.user_login();
            if google {
                let identity = flow.sign_in_with_google().await?;
                println!("signed in as {} ({})", identity.email, identity.user_id);
                return Ok(());
            }
            flow.submit_credentials(LoginForm {
                aadhaar_number: aadhaar,
                email,
                password,
            })
            .await?;
            let session = with_otp(async |code| flow.submit_code(&code).await).await?;
            println!("signed in as {} ({})", session.email, session.user_id);
        }
        Command::AdminLogin {
            identifier,
            password,
        } => {
            let mut flow = portal.admin_login();
            flow.submit_credentials(AdminCredentials {
                identifier,
                password,
            })
            .await?;
            let admin = with_otp(async |code| flow.submit_code(&code).await).await?;
            println!("admin {} verified", admin.username);
        }
        Command::Signup {
            full_name,
            dob,
            email,
            mobile,
            password,
            confirm_password,
            aadhaar,
            profile_pic,
            id_proof,
            academic_records,
        } => {
            let form = SignupForm {
                full_name,
                dob,
                email,
                mobile_number: mobile,
                password,
                confirm_password,
                aadhaar_number: aadhaar,
                profile_pic: read_attachment(&profile_pic)?,
                id_proof: read_attachment(&id_proof)?,
                academic_records: read_attachment(&academic_records)?,
            };
            let mut flow = portal.signup();
            flow.submit(form).await?;
            let session = with_otp(async |code| flow.submit_code(&code).await).await?;
            println!("registered {} ({})", session.email, session.user_id);
        }
        Command::ResetPassword { email } => {
            portal.password_reset().execute(&email).await?;
            println!("reset email sent to {email}");
        }
        Command::Profile { user_id } => {
            let record = portal.profile().execute(&user_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::SeedAdmins { domain, count } => {
            let written = portal.seed_admins().execute(&domain, count).await?;
            println!("seeded {written} admin records");
        }
    }
    Ok(())
}
