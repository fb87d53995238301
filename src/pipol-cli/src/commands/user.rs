use clap::Subcommand;
use pipol_api::NewUser;
use pipol_sdk::PipolClient;

#[derive(Subcommand)]
pub enum UserAction {
    /// List all users
    List,
    /// Create a new user
    Create {
        /// Full name
        #[arg(long)]
        fullname: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Get user details
    Get {
        /// User id
        id: i64,
    },
    /// Update a user
    Update {
        /// User id
        id: i64,
        /// New full name
        #[arg(long)]
        fullname: String,
        /// New email address
        #[arg(long)]
        email: String,
        /// New password, leave empty to keep the current one
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Delete a user
    Delete {
        /// User id
        id: i64,
    },
}

impl UserAction {
    pub async fn run(self, client: &PipolClient) -> anyhow::Result<()> {
        match self {
            UserAction::List => {
                let users = client.list_users().await?;
                println!("{}", serde_json::to_string_pretty(&users)?);
            }
            UserAction::Create {
                fullname,
                email,
                password,
            } => {
                let user = client
                    .create_user(NewUser {
                        fullname,
                        email,
                        password,
                    })
                    .await?;
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            UserAction::Get { id } => {
                let user = client.get_user(id).await?;
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            UserAction::Update {
                id,
                fullname,
                email,
                password,
            } => {
                let user = client
                    .update_user(
                        id,
                        NewUser {
                            fullname,
                            email,
                            password,
                        },
                    )
                    .await?;
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            UserAction::Delete { id } => {
                client.delete_user(id).await?;
                println!("User '{id}' deleted.");
            }
        }
        Ok(())
    }
}
