pub mod seaorm;

pub use seaorm::SeaOrmAdminRepository;
