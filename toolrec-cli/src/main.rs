//! toolrec - terminal client for the Tool Recommend catalog

mod config;
mod output;

use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Args, Command, FavoriteAction, ReviewAction};
use toolrec_client::{
    api, ApiClient, ApiError, ChatRequest, FallbackRouter, FileStore, HttpTransport, LoginRequest,
    NewRating, NewReview, SessionStore, SortBy, ToastManager, ToolQuery, User,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("toolrec={0},toolrec_client={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(2);
    }

    let config = args.client_config();
    debug!(base_url = %config.base_url, session_file = %args.session_file.display(), "starting");

    let store = Arc::new(FileStore::new(args.session_file.clone()));
    let session = SessionStore::load(store, config.session_keys.clone())?;
    let transport = HttpTransport::new(&config)?;
    let toasts = ToastManager::new(config.toast.clone(), Arc::new(output::TerminalRenderer));
    let client = ApiClient::new(
        config,
        Arc::new(transport),
        session,
        toasts,
        Arc::new(output::LoginHint),
    );

    let outcome = run(&client, args.command).await;

    // Let a pending login hint print before the process exits
    client.redirector().drain().await;

    match outcome {
        Ok(()) => Ok(()),
        // Pipeline errors were already shown to the user as a toast
        Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_reported) => {
            std::process::exit(1)
        }
        Err(e) => Err(e),
    }
}

async fn run(client: &ApiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { account, password } => {
            let result = api::users::login(client, &LoginRequest { account, password }).await?;
            let name = result.user["username"].as_str().unwrap_or("user");
            client.toasts().success(format!("Signed in as {}", name));
        }
        Command::Logout => {
            api::users::logout(client).await?;
            println!("Signed out");
        }
        Command::Whoami => match client.session().get().await {
            None => println!("Not signed in"),
            Some(session) => match session.user_as::<User>() {
                Some(user) => println!(
                    "{} (#{}){}",
                    user.username,
                    user.id,
                    user.email.map(|e| format!(" <{}>", e)).unwrap_or_default()
                ),
                None => println!("Signed in"),
            },
        },
        Command::Tools {
            category,
            sort,
            page,
            size,
        } => {
            let mut query = ToolQuery::page(page, size).sorted_by(SortBy::parse(&sort));
            if let Some(category) = category {
                query = query.in_category(category);
            }
            let router = FallbackRouter::bundled(client.clone())?;
            output::print_page(&router.query_tools(&query).await?);
        }
        Command::Tool { id } => {
            output::print_tool(&api::tools::tool_detail(client, id).await?);
        }
        Command::Categories => {
            for category in api::tools::categories(client).await? {
                println!(
                    "#{:<3} {:<20} {}",
                    category.id,
                    category.name,
                    category.tool_count.map(|n| format!("{} tools", n)).unwrap_or_default()
                );
            }
        }
        Command::Hot { limit } => {
            let router = FallbackRouter::bundled(client.clone())?;
            output::print_tools(&router.hot_tools(limit).await?);
        }
        Command::Latest { limit } => {
            let router = FallbackRouter::bundled(client.clone())?;
            output::print_tools(&router.latest_tools(limit).await?);
        }
        Command::Search {
            keyword,
            page,
            size,
        } => {
            output::print_page(&api::tools::search_tools(client, &keyword, page, size).await?);
        }
        Command::Upvote { id } => {
            api::tools::upvote_tool(client, id).await?;
            client.toasts().success("Upvoted");
        }
        Command::Favorites { action } => favorites(client, action).await?,
        Command::Reviews { action } => reviews(client, action).await?,
        Command::Rate { tool_id, score } => {
            api::ratings::submit_rating(client, &NewRating { tool_id, score }).await?;
            client.toasts().success("Rating saved");
        }
        Command::Ask { message, session } => {
            let request = ChatRequest {
                session_id: session,
                message,
                need_recommendation: Some(true),
                ..Default::default()
            };
            let reply = api::ai::chat(client, &request).await?;
            println!("{}", reply.message);
            if !reply.recommended_tools.is_empty() {
                output::print_tools(&reply.recommended_tools);
            }
            println!("(session {})", reply.session_id);
        }
        Command::Recommend { query, limit } => {
            output::print_tools(&api::ai::recommend_tools(client, &query, limit).await?);
        }
    }
    Ok(())
}

async fn favorites(client: &ApiClient, action: FavoriteAction) -> anyhow::Result<()> {
    match action {
        FavoriteAction::List { page, size } => {
            output::print_page(&api::favorites::my_favorites(client, page, size).await?);
        }
        FavoriteAction::Add { tool_id } => {
            api::favorites::add_favorite(client, tool_id).await?;
            client.toasts().success("Added to favorites");
        }
        FavoriteAction::Remove { tool_id } => {
            api::favorites::remove_favorite(client, tool_id).await?;
            client.toasts().success("Removed from favorites");
        }
        FavoriteAction::Check { tool_id } => {
            let saved = api::favorites::is_favorite(client, tool_id).await?;
            println!("{}", if saved { "yes" } else { "no" });
        }
    }
    Ok(())
}

async fn reviews(client: &ApiClient, action: ReviewAction) -> anyhow::Result<()> {
    match action {
        ReviewAction::List {
            tool_id,
            page,
            size,
        } => {
            output::print_reviews(&api::reviews::tool_reviews(client, tool_id, page, size).await?);
        }
        ReviewAction::Add {
            tool_id,
            rating,
            content,
            parent,
        } => {
            let review = NewReview {
                tool_id,
                rating,
                content,
                parent_id: parent,
            };
            let id = api::reviews::create_review(client, &review).await?;
            client.toasts().success(format!("Review #{} posted", id));
        }
        ReviewAction::Delete { id } => {
            api::reviews::delete_review(client, id).await?;
            client.toasts().success("Review deleted");
        }
        ReviewAction::Helpful { id } => {
            api::reviews::mark_helpful(client, id).await?;
            client.toasts().success("Marked as helpful");
        }
    }
    Ok(())
}
