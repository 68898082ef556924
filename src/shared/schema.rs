diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    agents (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    tickets (id) {
        id -> Uuid,
        customer_id -> Uuid,
        subject -> Text,
        description -> Text,
        priority -> Varchar,
        churn_risk -> Varchar,
        eta_hours -> Int4,
        status -> Varchar,
        assigned_agent_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    monthly_billing_summary (id) {
        id -> Uuid,
        user_id -> Uuid,
        month -> Varchar,
        total_amount -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tickets -> agents (assigned_agent_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, agents);
