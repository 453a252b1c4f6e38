//! Subcommands of the `mybank-pfm` dashboard CLI.
//!
//! Each command calls one client operation and renders the payload as
//! pretty-printed JSON.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use pfm_client::PfmClient;
use pfm_client::models::auth::{LoginRequest, RegisterRequest};
use pfm_client::models::payment::{PageQuery, TransferRequest};
use pfm_client::models::pfm::TransactionQuery;

use crate::config::Config;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No command given. Run with --help for usage information.")]
    Missing,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument <{arg}> for `{command}`")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("Invalid value '{value}' for {arg}")]
    InvalidValue { arg: &'static str, value: String },

    #[error("Unexpected argument: {0}")]
    Unexpected(String),
}

/// A parsed subcommand.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        email: String,
        password: String,
    },
    Register(RegisterArgs),
    Kakao {
        code: String,
    },
    Logout,
    Whoami,
    Status,
    Assets,
    Sync,
    Transactions {
        page: Option<u32>,
        size: Option<u32>,
        account_id: Option<String>,
    },
    Spending {
        days: Option<u32>,
    },
    Transfer(TransferArgs),
    Payment {
        id: String,
    },
    History {
        page: Option<u32>,
        size: Option<u32>,
    },
    Invest,
    RoundUp {
        enable: bool,
        account_id: String,
    },
    Config,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterArgs {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferArgs {
    pub from_account_id: String,
    pub to_account_id: String,
    pub recipient_name: String,
    pub amount: Decimal,
    pub description: String,
}

/// Positional and `--flag value` arguments after the command name.
struct Args {
    command: &'static str,
    inner: std::vec::IntoIter<String>,
}

impl Args {
    fn required(&mut self, arg: &'static str) -> Result<String, CommandError> {
        self.inner.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            arg,
        })
    }

    fn optional(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.inner.next() {
            Some(extra) => Err(CommandError::Unexpected(extra)),
            None => Ok(()),
        }
    }
}

fn parse_value<T: FromStr>(arg: &'static str, value: String) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidValue { arg, value })
}

impl Command {
    /// Parse a command from the arguments left after global options.
    ///
    /// `login` reads the password from `PFM_PASSWORD` when it is not given.
    pub fn parse(args: Vec<String>) -> Result<Self, CommandError> {
        let mut iter = args.into_iter();
        let name = iter.next().ok_or(CommandError::Missing)?;
        let command: &'static str = match name.as_str() {
            "login" => "login",
            "register" => "register",
            "kakao" => "kakao",
            "logout" => "logout",
            "whoami" => "whoami",
            "status" => "status",
            "assets" => "assets",
            "sync" => "sync",
            "transactions" => "transactions",
            "spending" => "spending",
            "transfer" => "transfer",
            "payment" => "payment",
            "history" => "history",
            "invest" => "invest",
            "roundup" => "roundup",
            "config" => "config",
            _ => return Err(CommandError::Unknown(name)),
        };
        let mut args = Args {
            command,
            inner: iter.collect::<Vec<_>>().into_iter(),
        };

        let parsed = match command {
            "login" => {
                let email = args.required("email")?;
                let password = match args.optional() {
                    Some(password) => password,
                    None => std::env::var("PFM_PASSWORD").map_err(|_| {
                        CommandError::MissingArgument {
                            command,
                            arg: "password",
                        }
                    })?,
                };
                Command::Login { email, password }
            }
            "register" => Command::Register(RegisterArgs {
                email: args.required("email")?,
                password: args.required("password")?,
                name: args.required("name")?,
                phone_number: args.required("phone")?,
            }),
            "kakao" => Command::Kakao {
                code: args.required("code")?,
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "status" => Command::Status,
            "assets" => Command::Assets,
            "sync" => Command::Sync,
            "transactions" => {
                let (mut page, mut size, mut account_id) = (None, None, None);
                while let Some(flag) = args.optional() {
                    match flag.as_str() {
                        "--page" => page = Some(parse_value("--page", args.required("page")?)?),
                        "--size" => size = Some(parse_value("--size", args.required("size")?)?),
                        "--account" => account_id = Some(args.required("account")?),
                        _ => return Err(CommandError::Unexpected(flag)),
                    }
                }
                Command::Transactions {
                    page,
                    size,
                    account_id,
                }
            }
            "spending" => {
                let mut days = None;
                while let Some(flag) = args.optional() {
                    match flag.as_str() {
                        "--days" => days = Some(parse_value("--days", args.required("days")?)?),
                        _ => return Err(CommandError::Unexpected(flag)),
                    }
                }
                Command::Spending { days }
            }
            "transfer" => {
                let from_account_id = args.required("from")?;
                let to_account_id = args.required("to")?;
                let recipient_name = args.required("recipient")?;
                let amount = parse_value("<amount>", args.required("amount")?)?;
                let description = args.optional().unwrap_or_default();
                Command::Transfer(TransferArgs {
                    from_account_id,
                    to_account_id,
                    recipient_name,
                    amount,
                    description,
                })
            }
            "payment" => Command::Payment {
                id: args.required("payment-id")?,
            },
            "history" => {
                let (mut page, mut size) = (None, None);
                while let Some(flag) = args.optional() {
                    match flag.as_str() {
                        "--page" => page = Some(parse_value("--page", args.required("page")?)?),
                        "--size" => size = Some(parse_value("--size", args.required("size")?)?),
                        _ => return Err(CommandError::Unexpected(flag)),
                    }
                }
                Command::History { page, size }
            }
            "invest" => Command::Invest,
            "roundup" => {
                let action = args.required("enable|disable")?;
                let enable = match action.as_str() {
                    "enable" => true,
                    "disable" => false,
                    _ => {
                        return Err(CommandError::InvalidValue {
                            arg: "<enable|disable>",
                            value: action,
                        });
                    }
                };
                Command::RoundUp {
                    enable,
                    account_id: args.required("account")?,
                }
            }
            _ => Command::Config,
        };

        args.finish()?;
        Ok(parsed)
    }

    /// Whether the command needs an API client.
    pub fn needs_client(&self) -> bool {
        !matches!(self, Command::Config)
    }
}

fn render<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Run a command and return its JSON output.
pub async fn run(client: &PfmClient, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => {
            let response = client
                .auth()
                .login(&LoginRequest::new(email, password))
                .await?;
            render(&response.user)
        }
        Command::Register(args) => {
            let request = RegisterRequest {
                email: args.email,
                password: args.password,
                name: args.name,
                phone_number: args.phone_number,
            };
            let response = client.auth().register(&request).await?;
            render(&response.user)
        }
        Command::Kakao { code } => {
            let response = client.auth().kakao_login(&code).await?;
            render(&response.user)
        }
        Command::Logout => {
            client.auth().logout().await?;
            render(&json!({"signedOut": true}))
        }
        Command::Whoami => render(&client.auth().me().await?),
        Command::Status => {
            let session = client.session();
            render(&json!({
                "authenticated": client.is_authenticated().await,
                "user": session.cached_user().await,
                "store": session.store_name(),
                "baseUrl": client.base_url().as_str(),
            }))
        }
        Command::Assets => render(&client.pfm().assets().await?),
        Command::Sync => {
            client.pfm().sync_assets().await?;
            render(&json!({"synced": true}))
        }
        Command::Transactions {
            page,
            size,
            account_id,
        } => {
            let query = TransactionQuery {
                page,
                size,
                account_id,
            };
            render(&client.pfm().transactions(&query).await?)
        }
        Command::Spending { days } => render(&client.pfm().spending_analysis(days).await?),
        Command::Transfer(args) => {
            let request = TransferRequest {
                from_account_id: args.from_account_id,
                to_account_id: args.to_account_id,
                recipient_name: args.recipient_name,
                amount: args.amount,
                description: args.description,
            };
            render(&client.payments().transfer(&request).await?)
        }
        Command::Payment { id } => render(&client.payments().payment(&id).await?),
        Command::History { page, size } => {
            render(&client.payments().history(PageQuery { page, size }).await?)
        }
        Command::Invest => render(&client.investments().summary().await?),
        Command::RoundUp { enable, account_id } => {
            if enable {
                client.investments().enable_round_up(&account_id).await?;
            } else {
                client.investments().disable_round_up(&account_id).await?;
            }
            render(&json!({"accountId": account_id, "roundUpEnabled": enable}))
        }
        Command::Config => anyhow::bail!("`config` does not use the API client"),
    }
}

/// Render the effective configuration, marking env-overridden settings.
pub fn render_config(config: &Config) -> String {
    let mut out = String::new();
    for (key, value, env_var) in config.settings_report() {
        match env_var {
            Some(env) => out.push_str(&format!("{key} = {value}    (from {env})\n")),
            None => out.push_str(&format!("{key} = {value}\n")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, CommandError> {
        Command::parse(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse(&["assets"]).unwrap(), Command::Assets);
        assert_eq!(parse(&["logout"]).unwrap(), Command::Logout);
        assert_eq!(parse(&["invest"]).unwrap(), Command::Invest);
        assert!(!parse(&["config"]).unwrap().needs_client());
        assert!(parse(&["status"]).unwrap().needs_client());
    }

    #[test]
    fn test_parse_login_with_password() {
        assert_eq!(
            parse(&["login", "user@example.com", "pw"]).unwrap(),
            Command::Login {
                email: "user@example.com".into(),
                password: "pw".into()
            }
        );
    }

    #[test]
    fn test_parse_transactions_flags() {
        assert_eq!(
            parse(&["transactions", "--page", "2", "--account", "acc-1"]).unwrap(),
            Command::Transactions {
                page: Some(2),
                size: None,
                account_id: Some("acc-1".into())
            }
        );
        assert_eq!(
            parse(&["transactions", "--page", "two"]),
            Err(CommandError::InvalidValue {
                arg: "--page",
                value: "two".into()
            })
        );
    }

    #[test]
    fn test_parse_transfer_amount() {
        let cmd = parse(&["transfer", "acc-1", "acc-2", "Lee", "50000.50", "rent"]).unwrap();
        match cmd {
            Command::Transfer(args) => {
                assert_eq!(args.amount, Decimal::new(5000050, 2));
                assert_eq!(args.description, "rent");
            }
            other => panic!("expected transfer, got {:?}", other),
        }
        assert!(parse(&["transfer", "acc-1", "acc-2", "Lee", "lots"]).is_err());
    }

    #[test]
    fn test_parse_roundup() {
        assert_eq!(
            parse(&["roundup", "disable", "acc-9"]).unwrap(),
            Command::RoundUp {
                enable: false,
                account_id: "acc-9".into()
            }
        );
        assert!(parse(&["roundup", "toggle", "acc-9"]).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&[]), Err(CommandError::Missing));
        assert_eq!(
            parse(&["frobnicate"]),
            Err(CommandError::Unknown("frobnicate".into()))
        );
        assert_eq!(
            parse(&["payment"]),
            Err(CommandError::MissingArgument {
                command: "payment",
                arg: "payment-id"
            })
        );
        assert_eq!(
            parse(&["assets", "extra"]),
            Err(CommandError::Unexpected("extra".into()))
        );
    }

    #[test]
    fn test_render_config_marks_overrides() {
        let out = render_config(&Config::default());
        assert!(out.contains("api.base_url = http://localhost:8080\n"));
        assert!(!out.contains("(from"));
    }
}
