pub mod seaorm;

pub use seaorm::SeaOrmClientRepository;
