mod display;
mod models;
mod session;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use models::Ingredient;
use session::{RecipeFields, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipehub")]
#[command(about = "RecipeHub CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, global = true, env = "RECIPEHUB_SERVER", default_value = "http://localhost:5000")]
    server: String,

    /// Bearer token from `recipehub login`
    #[arg(long, global = true, env = "RECIPEHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up (unauthenticated)
    Health,
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print a token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// List recipes, optionally filtered by name or cuisine
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one recipe
    Show {
        id: i64,
        /// Also list ingredient quantities scaled to this many servings
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        servings: u32,
    },
    /// Create a recipe
    Add(RecipeArgs),
    /// Change some fields of a recipe you created
    Edit {
        id: i64,
        #[command(flatten)]
        fields: RecipeArgs,
        /// Drop the current image
        #[arg(long, conflicts_with = "image")]
        remove_image: bool,
    },
    /// Delete a recipe (creator or admin)
    Delete { id: i64 },
    /// Rate and comment on a recipe
    Comment {
        id: i64,
        #[arg(long)]
        text: String,
        /// 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Remove a comment by its position (admin only)
    DeleteComment { id: i64, index: usize },
}

#[derive(Args)]
struct RecipeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    /// Minutes
    #[arg(long)]
    cooking_time: Option<u32>,
    /// NAME:QUANTITY[:UNIT], repeatable
    #[arg(long = "ingredient", value_parser = parse_ingredient)]
    ingredients: Vec<Ingredient>,
    /// Repeatable, in order
    #[arg(long = "step")]
    steps: Vec<String>,
    #[arg(long)]
    nutrition: Option<String>,
    #[arg(long)]
    youtube: Option<String>,
    /// Path to a .jpg or .png file
    #[arg(long)]
    image: Option<PathBuf>,
}

impl RecipeArgs {
    fn into_fields(self, remove_image: bool) -> RecipeFields {
        RecipeFields {
            name: self.name,
            cuisine: self.cuisine,
            cooking_time: self.cooking_time,
            ingredients: (!self.ingredients.is_empty()).then_some(self.ingredients),
            method_steps: (!self.steps.is_empty()).then_some(self.steps),
            nutritional_info: self.nutrition,
            youtube_link: self.youtube,
            image: self.image,
            remove_image,
        }
    }
}

fn parse_ingredient(raw: &str) -> Result<Ingredient, String> {
    let mut parts = raw.splitn(3, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let quantity = parts.next().unwrap_or_default();
    let unit = parts.next().unwrap_or_default();

    if name.is_empty() || quantity.is_empty() {
        return Err("expected NAME:QUANTITY[:UNIT]".to_string());
    }

    Ok(Ingredient {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::new(&cli.server, cli.token);

    match cli.command {
        Commands::Health => {
            let health = session.health().await?;
            println!("{}", health.status);
        }
        Commands::Register { username, password } => {
            println!("{}", session.register(&username, &password).await?.message);
        }
        Commands::Login { username, password } => {
            let login = session.login(&username, &password).await?;
            eprintln!(
                "Logged in as {}{}",
                login.username,
                if login.admin { " (admin)" } else { "" }
            );
            println!("{}", login.token);
        }
        Commands::List { search } => {
            let recipes = session.list(search.as_deref()).await?;
            if recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in &recipes {
                println!("{}", display::summary_line(recipe));
            }
        }
        Commands::Show { id, servings } => {
            let recipe = session.show(id).await?;
            print!("{}", display::render_recipe(&recipe, servings));
        }
        Commands::Add(args) => {
            let fields = args.into_fields(false);
            if fields.ingredients.is_none() || fields.method_steps.is_none() {
                bail!("add needs at least one --ingredient and one --step");
            }
            let recipe = session.add(&fields).await?;
            println!("Created recipe #{}", recipe.id);
        }
        Commands::Edit {
            id,
            fields,
            remove_image,
        } => {
            let recipe = session.edit(id, &fields.into_fields(remove_image)).await?;
            println!("Updated recipe #{}", recipe.id);
        }
        Commands::Delete { id } => {
            println!("{}", session.delete(id).await?.message);
        }
        Commands::Comment { id, text, rating } => {
            let response = session.comment(id, &text, rating).await?;
            println!(
                "{} (rating now {:.1})",
                response.message, response.recipe.rating
            );
        }
        Commands::DeleteComment { id, index } => {
            let response = session.delete_comment(id, index).await?;
            println!(
                "{} (rating now {:.1})",
                response.message, response.recipe.rating
            );
        }
    }

    Ok(())
}
