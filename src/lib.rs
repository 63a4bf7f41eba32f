//! Alien Invaders — the simulation core.
//!
//! A player ship fires bolts upward at a marching grid of aliens that fire
//! back, with score, lives, and level progression across waves.  The
//! library is the whole game minus I/O: the binary polls the keyboard,
//! feeds one `InputFrame` per frame into [`session::update`], and renders
//! whatever state comes back.

pub mod audio;
pub mod config;
pub mod entities;
pub mod session;
pub mod wave;
