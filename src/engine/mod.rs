// Engine modules: assets, audio, physics, scene graph, game loop

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod physics;
pub mod scene;
