mod riksdag;

pub use riksdag::RiksdagClient;
