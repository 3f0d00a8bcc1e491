mod auth;
mod behavioral;
mod coach;
mod coding;
mod health;
mod llm_topics;
mod mock_interview;
mod questions;
pub mod session_types;
mod system_design;

pub use auth::{
    get_profile_handler, login_handler, register_handler, update_profile_handler, AuthResponse,
    UserBody,
};
pub use behavioral::{
    end_behavioral_handler, get_behavioral_session_handler, respond_behavioral_handler,
    start_behavioral_handler,
};
pub use coach::{
    ability_map_handler, advise_handler, get_coach_profile_handler, put_coach_profile_handler,
};
pub use coding::{
    end_coding_handler, get_coding_session_handler, start_coding_handler, submit_coding_handler,
};
pub use health::health_handler;
pub use llm_topics::{
    generate_llm_questions_handler, grade_answer_handler, list_llm_questions_handler,
};
pub use mock_interview::{
    answer_mock_handler, end_mock_handler, interview_history_handler, start_mock_handler,
};
pub use questions::{
    delete_history_handler, generate_questions_handler, get_question_handler,
    list_history_handler, list_questions_handler,
};
pub use system_design::{
    end_system_design_handler, get_system_design_session_handler, start_system_design_handler,
    submit_system_design_handler,
};
