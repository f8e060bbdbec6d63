use clap::Args;
use shop_app::{
    auth::PasswordHasher,
    database::{self, Db},
    domain::accounts::{
        AccountsService, PgAccountsService,
        data::{AccountRole, NewAccount},
        records::UserUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    #[arg(long)]
    username: String,

    #[arg(long, default_value = "")]
    email: String,

    /// Account password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAccountsService::new(Db::new(pool), PasswordHasher::default());

    let user = service
        .create_account(
            NewAccount {
                uuid: UserUuid::new(),
                username: args.username,
                email: args.email,
                password: args.password,
            },
            AccountRole::Administrator,
        )
        .await
        .map_err(|error| format!("failed to create administrator: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("username: {}", user.username);

    Ok(())
}
