//! Esquema Diesel (generado manualmente). Reemplazable con `diesel print-schema`.
//!
//! El orden de columnas de las tablas de detalle coincide con el de los
//! enums de columnas de `esg-domain`.

diesel::table! {
    sites (id) {
        id -> Uuid,
        name -> Text,
        location -> Nullable<Text>,
        site_type -> Nullable<Text>,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        name -> Text,
        esg_type -> Text,
    }
}

diesel::table! {
    parameters (id) {
        id -> Uuid,
        name -> Text,
        unit -> Nullable<Text>,
        category_id -> Uuid,
    }
}

diesel::table! {
    esg_submissions (id) {
        id -> Uuid,
        site_id -> Uuid,
        period_start -> Date,
        period_end -> Date,
        status -> Text,
        submitted_by -> Text,
        reviewer -> Nullable<Text>,
        review_comment -> Nullable<Text>,
        submitted_at -> Timestamptz,
        reviewed_at -> Nullable<Timestamptz>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    environmental_data (id) {
        id -> Uuid,
        submission_id -> Uuid,
        total_electricity -> Nullable<Double>,
        grid_electricity -> Nullable<Double>,
        renewable_ppa -> Nullable<Double>,
        renewable_rooftop -> Nullable<Double>,
        diesel_consumption -> Nullable<Double>,
        petrol_consumption -> Nullable<Double>,
        lpg_consumption -> Nullable<Double>,
        png_consumption -> Nullable<Double>,
        coal_consumption -> Nullable<Double>,
        water_withdrawal -> Nullable<Double>,
        water_consumption -> Nullable<Double>,
        water_recycled -> Nullable<Double>,
        total_waste -> Nullable<Double>,
        hazardous_waste -> Nullable<Double>,
        non_hazardous_waste -> Nullable<Double>,
        waste_recycled -> Nullable<Double>,
        nox -> Nullable<Double>,
        sox -> Nullable<Double>,
        particulate_matter -> Nullable<Double>,
        r22 -> Nullable<Double>,
        r32 -> Nullable<Double>,
        r410 -> Nullable<Double>,
        r134a -> Nullable<Double>,
        r514a -> Nullable<Double>,
        co2 -> Nullable<Double>,
    }
}

diesel::table! {
    social_data (id) {
        id -> Uuid,
        submission_id -> Uuid,
        total_employees -> Nullable<Double>,
        male_employees -> Nullable<Double>,
        female_employees -> Nullable<Double>,
        new_hires -> Nullable<Double>,
        attrition -> Nullable<Double>,
        training_hours -> Nullable<Double>,
        safety_trainings -> Nullable<Double>,
        lost_time_injuries -> Nullable<Double>,
        fatalities -> Nullable<Double>,
        near_misses -> Nullable<Double>,
        csr_spend -> Nullable<Double>,
        community_beneficiaries -> Nullable<Double>,
    }
}

diesel::table! {
    governance_data (id) {
        id -> Uuid,
        submission_id -> Uuid,
        board_members -> Nullable<Double>,
        independent_directors -> Nullable<Double>,
        women_directors -> Nullable<Double>,
        board_meetings -> Nullable<Double>,
        ethics_complaints -> Nullable<Double>,
        whistleblower_reports -> Nullable<Double>,
        data_breaches -> Nullable<Double>,
        anti_corruption_trainings -> Nullable<Double>,
        policy_violations -> Nullable<Double>,
    }
}

diesel::joinable!(parameters -> categories (category_id));
diesel::joinable!(esg_submissions -> sites (site_id));
diesel::joinable!(environmental_data -> esg_submissions (submission_id));
diesel::joinable!(social_data -> esg_submissions (submission_id));
diesel::joinable!(governance_data -> esg_submissions (submission_id));

diesel::allow_tables_to_appear_in_same_query!(
    sites,
    categories,
    parameters,
    esg_submissions,
    environmental_data,
    social_data,
    governance_data,
);
