use std::{error::Error, fs::File, io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use csv::Writer;
use engine::{Dish, DishFilter, Engine, StatusFilter};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "savoro_admin")]
#[command(about = "Admin utilities for Savoro (catalogue listings and exports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./savoro.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Dishes(Dishes),
    Categories(Categories),
    #[command(name = "food-tags")]
    FoodTags(FoodTags),
    /// Write a CSV snapshot of the live catalogue.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct Dishes {
    #[command(subcommand)]
    command: DishesCommand,
}

#[derive(Subcommand, Debug)]
enum DishesCommand {
    List(DishListArgs),
}

#[derive(Args, Debug)]
struct DishListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    category: Option<i32>,
    #[arg(long)]
    tag: Option<i32>,
    /// `active`, `inactive` or `all`.
    #[arg(long, default_value = "active")]
    status: StatusFilter,
}

#[derive(Args, Debug)]
struct Categories {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    List(NamedListArgs),
    Create(NamedCreateArgs),
}

#[derive(Args, Debug)]
struct FoodTags {
    #[command(subcommand)]
    command: FoodTagsCommand,
}

#[derive(Subcommand, Debug)]
enum FoodTagsCommand {
    List(SearchArgs),
    Create(NamedCreateArgs),
}

#[derive(Args, Debug)]
struct NamedListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value = "active")]
    status: StatusFilter,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct NamedCreateArgs {
    #[arg(long)]
    name: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportKind {
    Dishes,
    Categories,
}

#[derive(Args, Debug)]
struct ExportArgs {
    kind: ExportKind,
    /// Output file. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct DishRow {
    id: i32,
    name: String,
    price: String,
    category: Option<String>,
    tags: String,
    is_active: bool,
}

impl From<Dish> for DishRow {
    fn from(dish: Dish) -> Self {
        Self {
            id: dish.meta.id,
            name: dish.name,
            price: dish.price.to_string(),
            category: dish.category.map(|category| category.name),
            tags: dish
                .tags
                .into_iter()
                .map(|tag| tag.name)
                .collect::<Vec<_>>()
                .join("|"),
            is_active: dish.meta.is_active,
        }
    }
}

#[derive(Serialize)]
struct CategoryRow {
    id: i32,
    name: String,
    dish_count: u64,
    is_active: bool,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_dish(dish: &Dish) {
    let category = dish
        .category
        .as_ref()
        .map_or("-", |category| category.name.as_str());
    let state = if dish.meta.is_active { "" } else { " (inactive)" };
    println!(
        "{:>5}  {:<40} {:>10}  {category}{state}",
        dish.meta.id, dish.name, dish.price
    );
}

async fn export(
    engine: &Engine,
    kind: ExportKind,
    output: Option<PathBuf>,
) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = Writer::from_writer(sink);

    let rows = match kind {
        ExportKind::Dishes => {
            let dishes = engine
                .find_dishes(&DishFilter::default().status(StatusFilter::All))
                .await?;
            let rows = dishes.len();
            for dish in dishes {
                writer.serialize(DishRow::from(dish))?;
            }
            rows
        }
        ExportKind::Categories => {
            let categories = engine.find_categories(None, StatusFilter::All).await?;
            let rows = categories.len();
            for stats in categories {
                writer.serialize(CategoryRow {
                    id: stats.category.meta.id,
                    name: stats.category.name,
                    dish_count: stats.dish_count,
                    is_active: stats.category.meta.is_active,
                })?;
            }
            rows
        }
    };

    writer.flush()?;
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Dishes(Dishes {
            command: DishesCommand::List(args),
        }) => {
            let mut filter = DishFilter::default().status(args.status);
            filter.search = args.search;
            filter.category_id = args.category;
            filter.tag_id = args.tag;

            let dishes = engine.find_dishes(&filter).await?;
            for dish in &dishes {
                print_dish(dish);
            }
            eprintln!("{} dishes", dishes.len());
        }
        Command::Categories(Categories { command }) => match command {
            CategoriesCommand::List(args) => {
                let categories = engine
                    .find_categories(args.search.as_deref(), args.status)
                    .await?;
                for stats in categories {
                    println!(
                        "{:>5}  {:<40} {:>4} dishes",
                        stats.category.meta.id, stats.category.name, stats.dish_count
                    );
                }
            }
            CategoriesCommand::Create(args) => {
                let category = engine.create_category(&args.name).await?;
                println!("created category: {} ({})", category.name, category.meta.id);
            }
        },
        Command::FoodTags(FoodTags { command }) => match command {
            FoodTagsCommand::List(args) => {
                let tags = engine.find_food_tags(args.search.as_deref()).await?;
                for tag in tags {
                    println!("{:>5}  {}", tag.meta.id, tag.name);
                }
            }
            FoodTagsCommand::Create(args) => {
                let tag = engine.create_food_tag(&args.name).await?;
                println!("created food tag: {} ({})", tag.name, tag.meta.id);
            }
        },
        Command::Export(args) => {
            let rows = export(&engine, args.kind, args.output).await?;
            eprintln!("exported {rows} rows");
        }
    }

    Ok(())
}
