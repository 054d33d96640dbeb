use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Dish {
    Table,
    Id,
    UserId,
    Name,
    Category,
    Servings,
    Ingredients,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum MealPlan {
    Table,
    Id,
    UserId,
    Date,
    MealType,
    DishId,
    PlannedServings,
    Prepared,
    PreparedAt,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum StockItem {
    Table,
    Id,
    UserId,
    Name,
    Quantity,
    Unit,
    Category,
    LowStockThreshold,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum FamilyMember {
    Table,
    Id,
    UserId,
    Name,
    Role,
    Age,
    Email,
    Preferences,
    Notes,
    CreatedAt,
}
