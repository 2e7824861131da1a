//! Demo data loader
//!
//! ```bash
//! cargo run -p campus-api --bin campus-seed
//! ```
//!
//! Applies migrations, then inserts an admin, agents, users, queues, tickets,
//! a rating, recipes and a meal plan. Every account uses [`SEED_PASSWORD`].
//! Running it against an already seeded database does nothing.

use campus_common::{hash_password, init_tracing, TracingConfig};
use campus_core::{
    Agent, AgentLevel, AgentRepository, IngredientRef, MealPlanEntry, MealPlanRepository, MealType,
    MessageSender, NewRecipeLine, Queue, QueueRepository, Rating, RatingRepository, Recipe,
    RecipeRepository, Role, Snowflake, SnowflakeGenerator, Tag, TagRepository, Ticket,
    TicketMessage, TicketRepository, User, UserRepository,
};
use campus_db::{
    create_pool, run_migrations, PgAgentRepository, PgMealPlanRepository, PgPool,
    PgQueueRepository, PgRatingRepository, PgRecipeRepository, PgTagRepository,
    PgTicketRepository, PgUserRepository, PoolConfig,
};
use chrono::Utc;
use tracing::info;

const SEED_PASSWORD: &str = "password123";
const ADMIN_EMAIL: &str = "admin@campus.local";

struct Seeder {
    ids: SnowflakeGenerator,
    password_hash: String,
    users: PgUserRepository,
    agents: PgAgentRepository,
    queues: PgQueueRepository,
    tickets: PgTicketRepository,
    ratings: PgRatingRepository,
    tags: PgTagRepository,
    recipes: PgRecipeRepository,
    meal_plans: PgMealPlanRepository,
}

impl Seeder {
    fn new(pool: &PgPool) -> anyhow::Result<Self> {
        Ok(Self {
            ids: SnowflakeGenerator::new(1023),
            password_hash: hash_password(SEED_PASSWORD)?,
            users: PgUserRepository::new(pool.clone()),
            agents: PgAgentRepository::new(pool.clone()),
            queues: PgQueueRepository::new(pool.clone()),
            tickets: PgTicketRepository::new(pool.clone()),
            ratings: PgRatingRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            recipes: PgRecipeRepository::new(pool.clone()),
            meal_plans: PgMealPlanRepository::new(pool.clone()),
        })
    }

    fn id(&self) -> Snowflake {
        self.ids.generate()
    }

    async fn user(&self, first: &str, last: &str, email: &str, role: Role) -> anyhow::Result<User> {
        let user = User::new(self.id(), first.to_string(), last.to_string(), email.to_string(), role);
        self.users.create(&user, &self.password_hash).await?;
        Ok(user)
    }

    async fn agent(&self, first: &str, last: &str, email: &str, level: AgentLevel) -> anyhow::Result<Agent> {
        let user = User::new(self.id(), first.to_string(), last.to_string(), email.to_string(), Role::Agent);
        let agent = Agent::new(self.id(), user.id, level, 5);
        self.agents.create_with_user(&user, &self.password_hash, &agent).await?;
        Ok(agent)
    }

    async fn queue(&self, title: &str) -> anyhow::Result<Queue> {
        let queue = Queue::new(self.id(), title.to_string());
        self.queues.create(&queue).await?;
        Ok(queue)
    }

    async fn ticket(&self, queue: &Queue, owner: &User, title: &str, text: &str) -> anyhow::Result<Ticket> {
        let ticket = Ticket::new(self.id(), queue.id, owner.id, title.to_string());
        let message = TicketMessage::new(self.id(), ticket.id, MessageSender::User, text)?;
        self.tickets.create(&ticket, &message).await?;
        Ok(ticket)
    }

    async fn reply(&self, ticket: &Ticket, sender: MessageSender, text: &str) -> anyhow::Result<()> {
        let message = TicketMessage::new(self.id(), ticket.id, sender, text)?;
        self.tickets.add_message(&message).await?;
        Ok(())
    }

    async fn tag(&self, name: &str, kind: &str) -> anyhow::Result<Tag> {
        let tag = Tag {
            id: self.id(),
            name: name.to_string(),
            kind: kind.to_string(),
        };
        self.tags.create(&tag).await?;
        Ok(tag)
    }

    async fn recipe(
        &self,
        author: &User,
        title: &str,
        instructions: &str,
        lines: &[(&str, f64, &str)],
        tags: &[&Tag],
    ) -> anyhow::Result<Recipe> {
        let now = Utc::now();
        let recipe = Recipe {
            id: self.id(),
            author_id: author.id,
            title: title.to_string(),
            description: None,
            instructions: instructions.to_string(),
            prep_time: 20,
            servings: 2,
            created_at: now,
            updated_at: now,
        };
        let lines: Vec<NewRecipeLine> = lines
            .iter()
            .map(|(name, amount, unit)| NewRecipeLine {
                ingredient: IngredientRef::Named {
                    id: self.id(),
                    name: (*name).to_string(),
                },
                amount: *amount,
                unit: (*unit).to_string(),
            })
            .collect();
        let tag_ids: Vec<Snowflake> = tags.iter().map(|tag| tag.id).collect();

        self.recipes.create(&recipe, &lines, &tag_ids).await?;
        Ok(recipe)
    }

    async fn run(&self) -> anyhow::Result<()> {
        let admin = self.user("Ada", "Admin", ADMIN_EMAIL, Role::Admin).await?;
        let alice = self.user("Alice", "Student", "alice@campus.local", Role::User).await?;
        let bob = self.user("Bob", "Student", "bob@campus.local", Role::User).await?;

        let senior = self.agent("Sam", "Senior", "sam@campus.local", AgentLevel::Senior).await?;
        self.agent("Jo", "Junior", "jo@campus.local", AgentLevel::Junior).await?;
        info!("Seeded accounts");

        let it = self.queue("IT support").await?;
        let housing = self.queue("Housing").await?;
        self.queue("Library").await?;

        let wifi = self
            .ticket(&it, &alice, "Wi-Fi drops in dorm B", "The connection drops every few minutes.")
            .await?;
        self.tickets.claim(wifi.id, senior.id).await?;
        self.reply(&wifi, MessageSender::Agent, "We replaced the access point, please try again.")
            .await?;
        self.reply(&wifi, MessageSender::User, "Works now, thanks!").await?;
        self.tickets.close(wifi.id).await?;

        let rating = Rating::new(
            self.id(),
            wifi.id,
            senior.id,
            alice.id,
            5,
            Some("Fast and friendly".to_string()),
        )?;
        self.ratings.create(&rating).await?;

        self.ticket(&housing, &bob, "Broken heater", "Room 214 has no heating.")
            .await?;
        info!("Seeded helpdesk");

        let vegetarian = self.tag("vegetarian", "diet").await?;
        let italian = self.tag("italian", "cuisine").await?;
        self.tag("quick", "time").await?;

        let pasta = self
            .recipe(
                &admin,
                "Tomato pasta",
                "Boil the pasta, simmer the tomatoes with garlic, combine.",
                &[("pasta", 200.0, "g"), ("tomato", 3.0, "pcs"), ("garlic", 2.0, "cloves")],
                &[&vegetarian, &italian],
            )
            .await?;
        let omelette = self
            .recipe(
                &alice,
                "Cheese omelette",
                "Whisk the eggs, pour into a hot pan, add cheese and fold.",
                &[("egg", 3.0, "pcs"), ("cheese", 50.0, "g")],
                &[&vegetarian],
            )
            .await?;
        let salad = self
            .recipe(
                &alice,
                "Caprese salad",
                "Slice tomato and mozzarella, layer, season with olive oil.",
                &[("tomato", 2.0, "pcs"), ("mozzarella", 125.0, "g")],
                &[&italian],
            )
            .await?;

        let today = Utc::now().date_naive();
        for (recipe, meal_type) in [
            (&omelette, MealType::Breakfast),
            (&salad, MealType::Lunch),
            (&pasta, MealType::Dinner),
        ] {
            let entry = MealPlanEntry::new(self.id(), alice.id, recipe.id, today, meal_type);
            self.meal_plans.create(&entry).await?;
        }
        info!("Seeded kitchen");

        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    if let Err(e) = init_tracing(TracingConfig::default()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let pool = create_pool(&PoolConfig::from_env()).await?;
    run_migrations(&pool).await?;

    let seeder = Seeder::new(&pool)?;
    if seeder.users.email_exists(ADMIN_EMAIL).await? {
        info!("Database already seeded");
        return Ok(());
    }

    seeder.run().await?;
    info!(password = SEED_PASSWORD, "Seed complete");
    Ok(())
}
