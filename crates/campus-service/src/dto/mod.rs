//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateAgentRequest, CreateMealPlanRequest, CreateRatingRequest, CreateRecipeRequest,
    CreateTagRequest, CreateTicketRequest, CreateUserRequest, DateQuery, LoginRequest,
    LogoutRequest, PostMessageRequest, QueueRequest, RecipeLineRequest, RecipeListQuery,
    RefreshTokenRequest, RegisterRequest, StreamQuery, UpdateAgentRequest,
    UpdatePreferencesRequest, UpdateRecipeRequest, UpdateUserRequest, UserListQuery,
};

pub use responses::{
    AgentDashboardResponse, AgentResponse, AuthResponse, ClaimEvent, CloseEvent, HealthChecks,
    HealthResponse, IngredientResponse, MealPlanEntryResponse, MessageEvent, PaginatedResponse,
    QueueResponse, RatingResponse, ReadinessResponse, RecipeLineResponse, RecipePageResponse,
    RecipeResponse, TagResponse, TicketDetailResponse, TicketMessageResponse, TicketResponse,
    UserResponse,
};
