pub mod hitbox;
