pub mod seaorm;

pub use seaorm::SeaOrmReviewRepository;
