diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        password -> Text,
        role -> Text,
    }
}

diesel::table! {
    patients (id) {
        id -> Integer,
        user_id -> Nullable<Integer>,
        name -> Text,
        national_id -> Text,
        birth_date -> Nullable<Date>,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
        password -> Text,
    }
}

diesel::table! {
    professionals (id) {
        id -> Integer,
        name -> Text,
        license -> Nullable<Text>,
        specialty -> Nullable<Text>,
        email -> Text,
        password -> Text,
        kind -> Text,
    }
}

diesel::table! {
    schedules (id) {
        id -> Integer,
        professional_id -> Integer,
        date -> Date,
    }
}

diesel::table! {
    slots (id) {
        id -> Integer,
        schedule_id -> Integer,
        time -> Time,
        available -> Bool,
    }
}

diesel::table! {
    bookings (id) {
        id -> Integer,
        patient_id -> Integer,
        professional_id -> Integer,
        schedule_id -> Nullable<Integer>,
        slot_id -> Nullable<Integer>,
        date -> Date,
        time -> Time,
        status -> Text,
        is_remote -> Bool,
        remote_link -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    medical_records (id) {
        id -> Integer,
        patient_id -> Integer,
        professional_id -> Integer,
        recorded_at -> Timestamp,
        description -> Text,
    }
}

diesel::table! {
    prescriptions (id) {
        id -> Integer,
        patient_id -> Integer,
        professional_id -> Integer,
        issued_at -> Timestamp,
        content -> Text,
        digital_signature -> Nullable<Text>,
    }
}

diesel::table! {
    exams (id) {
        id -> Integer,
        patient_id -> Integer,
        name -> Text,
        scheduled_at -> Timestamp,
        status -> Text,
    }
}

diesel::table! {
    notifications (id) {
        id -> Integer,
        patient_id -> Nullable<Integer>,
        title -> Text,
        message -> Text,
        read -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    beds (id) {
        id -> Integer,
        number -> Text,
        kind -> Nullable<Text>,
        occupied -> Bool,
    }
}

diesel::table! {
    admissions (id) {
        id -> Integer,
        patient_id -> Integer,
        bed_id -> Integer,
        admitted_at -> Timestamp,
        discharged_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(schedules -> professionals (professional_id));
diesel::joinable!(slots -> schedules (schedule_id));
diesel::joinable!(admissions -> beds (bed_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    patients,
    professionals,
    schedules,
    slots,
    bookings,
    medical_records,
    prescriptions,
    exams,
    notifications,
    beds,
    admissions,
);
