//! Frame buffer layout shared with the JS renderer.
//! Must stay in sync with the renderer's `protocol.ts`.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Bodies: BODY_COUNT × 2 floats]   display-space x, y
//! [Trail:  sample_count × 2 floats] newest first
//! ```
//!
//! Sizes are written into the header once per frame; the renderer reads
//! them to compute offsets and draws `visible_count` trail vertices.
//!
//! The frame counter wraps at 2^24, the last integer f32 holds exactly.
//! Readers compare it for change, never for order across a wrap.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::api::simulation::Simulation;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_CURRENT_TIME: usize = 2;
pub const HEADER_SUN_LONGITUDE: usize = 3;
pub const HEADER_ECLIPTIC_LONGITUDE: usize = 4;
pub const HEADER_ANIMATION_ENABLED: usize = 5;
pub const HEADER_SAMPLE_COUNT: usize = 6;
pub const HEADER_VISIBLE_COUNT: usize = 7;
pub const HEADER_CANVAS_SIDE: usize = 8;
pub const HEADER_ELAPSED_YEARS: usize = 9;
pub const HEADER_ELAPSED_DAYS: usize = 10;
pub const HEADER_DEFERENT_RADIUS: usize = 11;
pub const HEADER_EPICYCLE_RADIUS: usize = 12;
pub const HEADER_BODY_COUNT: usize = 13;
// 14..16 reserved

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Frame counter period in the header.
pub const FRAME_COUNTER_WRAP: u64 = 1 << 24;

/// Header value for a tick count.
pub fn frame_counter_value(count: u64) -> f32 {
    (count % FRAME_COUNTER_WRAP) as f32
}

/// Body slots, in buffer order.
pub const BODY_EARTH: usize = 0;
pub const BODY_ECCENTRIC_CENTER: usize = 1;
pub const BODY_EQUANT: usize = 2;
pub const BODY_EPICYCLE_CENTER: usize = 3;
pub const BODY_PLANET: usize = 4;
pub const BODY_SUN: usize = 5;
pub const BODY_COUNT: usize = 6;

/// Floats per body or trail vertex: x, y.
pub const VERTEX_FLOATS: usize = 2;

/// One display-space point on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub x: f32,
    pub y: f32,
}

impl TrailVertex {
    pub const FLOATS: usize = VERTEX_FLOATS;
}

impl From<DVec2> for TrailVertex {
    fn from(p: DVec2) -> Self {
        Self {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

/// Section sizes and offsets for a given trail capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    /// Interpolated trail points.
    pub sample_count: usize,

    /// Size of the body section in floats.
    pub body_data_floats: usize,
    /// Size of the trail section in floats.
    pub trail_data_floats: usize,

    /// Offset (in floats) where body data begins.
    pub body_data_offset: usize,
    /// Offset (in floats) where trail data begins.
    pub trail_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl FrameLayout {
    pub fn new(sample_count: usize) -> Self {
        let body_data_floats = BODY_COUNT * VERTEX_FLOATS;
        let trail_data_floats = sample_count * VERTEX_FLOATS;

        let body_data_offset = HEADER_FLOATS;
        let trail_data_offset = body_data_offset + body_data_floats;

        let buffer_total_floats = trail_data_offset + trail_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            sample_count,
            body_data_floats,
            trail_data_floats,
            body_data_offset,
            trail_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    pub fn for_simulation(sim: &Simulation) -> Self {
        Self::new(sim.tracer().sample_count())
    }
}

/// Packed frame, rewritten after every tick.
pub struct FrameBuffer {
    layout: FrameLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(layout: FrameLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self { layout, data }
    }

    pub fn for_simulation(sim: &Simulation) -> Self {
        Self::new(FrameLayout::for_simulation(sim))
    }

    /// Pack the simulation's last completed tick.
    pub fn write(&mut self, sim: &Simulation) {
        let positions = sim.positions();
        let mapper = sim.mapper();
        let tracer = sim.tracer();
        let elapsed = sim.elapsed();
        let layout = &self.layout;

        let header = &mut self.data[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame_counter_value(sim.frame_count());
        header[HEADER_CURRENT_TIME] = sim.current_time() as f32;
        header[HEADER_SUN_LONGITUDE] = positions.sun_longitude as f32;
        header[HEADER_ECLIPTIC_LONGITUDE] = positions.ecliptic_longitude as f32;
        header[HEADER_ANIMATION_ENABLED] = if sim.controls().is_animation_enabled { 1.0 } else { 0.0 };
        header[HEADER_SAMPLE_COUNT] = layout.sample_count as f32;
        header[HEADER_VISIBLE_COUNT] = tracer.visible_count() as f32;
        header[HEADER_CANVAS_SIDE] = mapper.canvas_side() as f32;
        header[HEADER_ELAPSED_YEARS] = elapsed.years as f32;
        header[HEADER_ELAPSED_DAYS] = elapsed.days as f32;
        header[HEADER_DEFERENT_RADIUS] = mapper.to_display_length(crate::core::kinematics::DEFERENT_RADIUS) as f32;
        header[HEADER_EPICYCLE_RADIUS] = mapper.to_display_length(sim.parameters().epicycle_size) as f32;
        header[HEADER_BODY_COUNT] = BODY_COUNT as f32;

        let mut bodies = [TrailVertex::default(); BODY_COUNT];
        bodies[BODY_EARTH] = mapper.to_display(DVec2::ZERO).into();
        bodies[BODY_ECCENTRIC_CENTER] = mapper.to_display(positions.eccentric_center).into();
        bodies[BODY_EQUANT] = mapper.to_display(positions.equant).into();
        bodies[BODY_EPICYCLE_CENTER] = mapper.to_display(positions.epicycle_center()).into();
        bodies[BODY_PLANET] = mapper.to_display(positions.planet).into();
        bodies[BODY_SUN] = mapper.to_display(positions.sun).into();
        let body_range = layout.body_data_offset..layout.trail_data_offset;
        self.data[body_range].copy_from_slice(bytemuck::cast_slice(&bodies));

        let trail: &mut [TrailVertex] =
            bytemuck::cast_slice_mut(&mut self.data[layout.trail_data_offset..]);
        for (dst, src) in trail.iter_mut().zip(tracer.points()) {
            *dst = (*src).into();
        }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn header(&self) -> &[f32] {
        &self.data[..HEADER_FLOATS]
    }

    /// Display-space position of a body slot.
    pub fn body(&self, slot: usize) -> TrailVertex {
        let bodies: &[TrailVertex] =
            bytemuck::cast_slice(&self.data[self.layout.body_data_offset..self.layout.trail_data_offset]);
        bodies[slot]
    }

    /// The whole trail section, newest first.
    pub fn trail(&self) -> &[TrailVertex] {
        bytemuck::cast_slice(&self.data[self.layout.trail_data_offset..])
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn trail_ptr(&self) -> *const f32 {
        self.data[self.layout.trail_data_offset..].as_ptr()
    }
}
