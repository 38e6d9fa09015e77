diesel::table! {
    safe_locations (id) {
        id -> Integer,
        name -> Text,
        latitude -> Double,
        longitude -> Double,
        capacity -> Nullable<Integer>,
        contact -> Nullable<Text>,
        #[sql_name = "type"]
        kind -> Nullable<Text>,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    emergency_reports (id) {
        id -> Integer,
        user_id -> Nullable<Text>,
        latitude -> Nullable<Double>,
        longitude -> Nullable<Double>,
        timestamp -> Nullable<Text>,
        status -> Text,
        video_path -> Nullable<Text>,
        description -> Nullable<Text>,
        created_at -> Text,
    }
}
