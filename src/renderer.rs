//! OpenGL renderer: the Mode-7 floor shader and the billboard batcher.
//!
//! The floor fragment shader is the GPU twin of `projection::screen_to_floor`;
//! keep the two in step or sprites will slide against the floor.

use crate::camera::CameraState;
use crate::error::{Mode7Error, Result};
use crate::floor_texture::FloorTexture;
use crate::systems::SpriteQuad;
use glam::Mat4;
use glow::*;
use std::mem;
use std::sync::Arc;
use tracing::debug;

const FLOOR_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;

out vec2 vUv;

void main() {
    // Top-left origin, like screen pixels
    vUv = vec2(aPos.x * 0.5 + 0.5, 0.5 - aPos.y * 0.5);
    gl_Position = vec4(aPos, 0.0, 1.0);
}
"#;

const FLOOR_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 vUv;
out vec4 FragColor;

uniform sampler2D uFloor;
uniform vec2 uTextureSize;
uniform vec2 uOrigin;
uniform float uHeight;
uniform float uFacing;
uniform float uFov;
uniform float uHorizon;
uniform vec2 uViewport;

void main() {
    float rotation = radians(uFacing - uFov);
    float rotationSin = sin(rotation);
    float rotationCos = cos(rotation);

    vec2 screen = vUv * uViewport;
    // Horizon row counts as sky
    if (screen.y <= uHorizon) {
        discard;
    }

    float depthZ = uHorizon - screen.y;
    float lateral = uViewport.x - screen.x;
    vec2 floorPos = uOrigin + vec2(
        (lateral * rotationCos - screen.x * rotationSin) / depthZ,
        (lateral * rotationSin + screen.x * rotationCos) / depthZ
    ) * uHeight;

    FragColor = vec4(texture(uFloor, floorPos / uTextureSize).rgb, 1.0);
}
"#;

const SPRITE_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;
layout (location = 1) in vec4 aInstanceRect;
layout (location = 2) in vec3 aInstanceColor;

uniform mat4 uProjection;

out vec2 vLocal;
out vec3 vColor;

void main() {
    vec2 screenPos = aInstanceRect.xy + aPos * aInstanceRect.zw;
    gl_Position = uProjection * vec4(screenPos, 0.0, 1.0);
    vLocal = aPos;
    vColor = aInstanceColor;
}
"#;

const SPRITE_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 vLocal;
in vec3 vColor;
out vec4 FragColor;

void main() {
    float d = length(vLocal * 2.0 - 1.0);
    if (d > 1.0) {
        discard;
    }
    // Darker rim so overlapping billboards stay readable
    float rim = smoothstep(0.75, 1.0, d);
    FragColor = vec4(mix(vColor, vColor * 0.4, rim), 1.0);
}
"#;

/// Floats per sprite instance: rect (4) + color (3)
const SPRITE_INSTANCE_FLOATS: usize = 7;

struct FloorUniforms {
    texture: NativeUniformLocation,
    texture_size: NativeUniformLocation,
    origin: NativeUniformLocation,
    height: NativeUniformLocation,
    facing: NativeUniformLocation,
    fov: NativeUniformLocation,
    horizon: NativeUniformLocation,
    viewport: NativeUniformLocation,
}

pub struct Renderer {
    gl: Arc<glow::Context>,
    // Floor
    floor_program: NativeProgram,
    floor_vao: NativeVertexArray,
    floor_vbo: NativeBuffer,
    floor_uniforms: FloorUniforms,
    floor_texture: NativeTexture,
    floor_texture_size: (u32, u32),
    // Billboards
    sprite_program: NativeProgram,
    sprite_vao: NativeVertexArray,
    sprite_vbo: NativeBuffer,
    sprite_instance_vbo: NativeBuffer,
    sprite_projection_loc: NativeUniformLocation,
    instance_data: Vec<f32>,
    /// Letterboxed draw rect (x, y, width, height) in window pixels
    viewport_rect: [i32; 4],
}

/// Largest rect with the logical aspect ratio that fits the window, centred.
pub fn letterbox(width: u32, height: u32, logical_width: f32, logical_height: f32) -> [i32; 4] {
    let scale = (width as f32 / logical_width).min(height as f32 / logical_height);
    let fitted_w = (logical_width * scale) as i32;
    let fitted_h = (logical_height * scale) as i32;
    [
        (width as i32 - fitted_w) / 2,
        (height as i32 - fitted_h) / 2,
        fitted_w,
        fitted_h,
    ]
}

unsafe fn compile_program(gl: &glow::Context, vertex_src: &str, fragment_src: &str) -> Result<NativeProgram> {
    let program = gl.create_program().map_err(Mode7Error::Gpu)?;

    let mut shaders = Vec::with_capacity(2);
    let mut failure = None;
    for (stage, source) in [(VERTEX_SHADER, vertex_src), (FRAGMENT_SHADER, fragment_src)] {
        let shader = match gl.create_shader(stage) {
            Ok(shader) => shader,
            Err(e) => {
                failure = Some(Mode7Error::Gpu(e));
                break;
            }
        };
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            failure = Some(Mode7Error::Shader(gl.get_shader_info_log(shader)));
            gl.delete_shader(shader);
            break;
        }
        gl.attach_shader(program, shader);
        shaders.push(shader);
    }

    if failure.is_none() {
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            failure = Some(Mode7Error::Shader(gl.get_program_info_log(program)));
        }
    }

    for shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }
    if let Some(e) = failure {
        gl.delete_program(program);
        return Err(e);
    }
    Ok(program)
}

unsafe fn uniform(gl: &glow::Context, program: NativeProgram, name: &str) -> Result<NativeUniformLocation> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| Mode7Error::Gpu(format!("missing uniform {name}")))
}

impl Renderer {
    pub fn new(gl: Arc<glow::Context>, floor: &FloorTexture) -> Result<Self> {
        unsafe {
            let floor_program = compile_program(&gl, FLOOR_VERTEX_SHADER, FLOOR_FRAGMENT_SHADER)?;
            let floor_uniforms = FloorUniforms {
                texture: uniform(&gl, floor_program, "uFloor")?,
                texture_size: uniform(&gl, floor_program, "uTextureSize")?,
                origin: uniform(&gl, floor_program, "uOrigin")?,
                height: uniform(&gl, floor_program, "uHeight")?,
                facing: uniform(&gl, floor_program, "uFacing")?,
                fov: uniform(&gl, floor_program, "uFov")?,
                horizon: uniform(&gl, floor_program, "uHorizon")?,
                viewport: uniform(&gl, floor_program, "uViewport")?,
            };

            // One triangle covering the whole viewport
            let fullscreen: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];
            let floor_vao = gl.create_vertex_array().map_err(Mode7Error::Gpu)?;
            gl.bind_vertex_array(Some(floor_vao));
            let floor_vbo = gl.create_buffer().map_err(Mode7Error::Gpu)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(floor_vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&fullscreen), STATIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);
            gl.bind_vertex_array(None);

            let floor_texture = gl.create_texture().map_err(Mode7Error::Gpu)?;

            let sprite_program = compile_program(&gl, SPRITE_VERTEX_SHADER, SPRITE_FRAGMENT_SHADER)?;
            let sprite_projection_loc = uniform(&gl, sprite_program, "uProjection")?;

            // Unit quad (0,0 to 1,1)
            let quad: [f32; 12] = [
                0.0, 0.0, // top-left
                1.0, 0.0, // top-right
                1.0, 1.0, // bottom-right
                0.0, 0.0, // top-left
                1.0, 1.0, // bottom-right
                0.0, 1.0, // bottom-left
            ];

            let sprite_vao = gl.create_vertex_array().map_err(Mode7Error::Gpu)?;
            gl.bind_vertex_array(Some(sprite_vao));

            let sprite_vbo = gl.create_buffer().map_err(Mode7Error::Gpu)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(sprite_vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&quad), STATIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);

            let sprite_instance_vbo = gl.create_buffer().map_err(Mode7Error::Gpu)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(sprite_instance_vbo));
            let stride = (SPRITE_INSTANCE_FLOATS * mem::size_of::<f32>()) as i32;

            // Rect attribute (4 floats)
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 4, FLOAT, false, stride, 0);
            gl.vertex_attrib_divisor(1, 1);

            // Color attribute (3 floats)
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 3, FLOAT, false, stride, 16);
            gl.vertex_attrib_divisor(2, 1);

            gl.bind_vertex_array(None);

            let mut renderer = Self {
                gl,
                floor_program,
                floor_vao,
                floor_vbo,
                floor_uniforms,
                floor_texture,
                floor_texture_size: (0, 0),
                sprite_program,
                sprite_vao,
                sprite_vbo,
                sprite_instance_vbo,
                sprite_projection_loc,
                instance_data: Vec::new(),
                viewport_rect: [0, 0, 1, 1],
            };
            renderer.set_floor(floor);
            Ok(renderer)
        }
    }

    /// Upload a new floor image (e.g. on level change).
    pub fn set_floor(&mut self, floor: &FloorTexture) {
        let image = floor.image();
        let (width, height) = image.dimensions();
        unsafe {
            let gl = &self.gl;
            gl.bind_texture(TEXTURE_2D, Some(self.floor_texture));

            // Nearest + repeat: crisp texels, endlessly tiled floor
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, NEAREST as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, NEAREST as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_S, REPEAT as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_T, REPEAT as i32);

            gl.tex_image_2d(
                TEXTURE_2D,
                0,
                RGBA as i32,
                width as i32,
                height as i32,
                0,
                RGBA,
                UNSIGNED_BYTE,
                Some(image.as_raw()),
            );
            gl.bind_texture(TEXTURE_2D, None);
        }
        self.floor_texture_size = (width, height);
        debug!(width, height, "uploaded floor texture");
    }

    /// Fit the logical viewport into the window, letterboxed.
    /// The rect is applied on every draw since egui resets the viewport
    /// when it paints.
    pub fn resize(&mut self, width: u32, height: u32, logical_width: f32, logical_height: f32) {
        self.viewport_rect = letterbox(width, height, logical_width, logical_height);
    }

    fn apply_viewport(&self) {
        let [x, y, width, height] = self.viewport_rect;
        unsafe {
            self.gl.viewport(x, y, width, height);
        }
    }

    pub fn clear(&self, sky: [u8; 3]) {
        unsafe {
            self.gl.clear_color(sky[0] as f32 / 255.0, sky[1] as f32 / 255.0, sky[2] as f32 / 255.0, 1.0);
            self.gl.clear(COLOR_BUFFER_BIT);
        }
    }

    /// Draw the floor below the horizon.
    pub fn render_floor(&self, camera: &CameraState) {
        self.apply_viewport();
        let gl = &self.gl;
        let u = &self.floor_uniforms;
        unsafe {
            gl.disable(BLEND);
            gl.use_program(Some(self.floor_program));
            gl.active_texture(TEXTURE0);
            gl.bind_texture(TEXTURE_2D, Some(self.floor_texture));
            gl.uniform_1_i32(Some(&u.texture), 0);
            gl.uniform_2_f32(
                Some(&u.texture_size),
                self.floor_texture_size.0 as f32,
                self.floor_texture_size.1 as f32,
            );
            gl.uniform_2_f32(Some(&u.origin), camera.origin.x, camera.origin.y);
            gl.uniform_1_f32(Some(&u.height), camera.height);
            gl.uniform_1_f32(Some(&u.facing), camera.facing_degrees);
            gl.uniform_1_f32(Some(&u.fov), camera.fov_degrees);
            gl.uniform_1_f32(Some(&u.horizon), camera.horizon_pixel);
            gl.uniform_2_f32(Some(&u.viewport), camera.viewport_width, camera.viewport_height);

            gl.bind_vertex_array(Some(self.floor_vao));
            gl.draw_arrays(TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
        }
    }

    /// Draw billboards in the order given (expected back to front).
    pub fn render_sprites(&mut self, camera: &CameraState, quads: &[SpriteQuad]) {
        if quads.is_empty() {
            return;
        }

        self.instance_data.clear();
        for quad in quads {
            self.instance_data.extend_from_slice(&[
                quad.position.x,
                quad.position.y,
                quad.size.x,
                quad.size.y,
                quad.color.x,
                quad.color.y,
                quad.color.z,
            ]);
        }

        // Screen pixels, y down
        let projection = Mat4::orthographic_rh_gl(0.0, camera.viewport_width, camera.viewport_height, 0.0, -1.0, 1.0);

        self.apply_viewport();
        let gl = &self.gl;
        unsafe {
            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
            gl.use_program(Some(self.sprite_program));
            gl.uniform_matrix_4_f32_slice(Some(&self.sprite_projection_loc), false, projection.as_ref());

            gl.bind_vertex_array(Some(self.sprite_vao));
            gl.bind_buffer(ARRAY_BUFFER, Some(self.sprite_instance_vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&self.instance_data), DYNAMIC_DRAW);
            gl.draw_arrays_instanced(TRIANGLES, 0, 6, quads.len() as i32);
            gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.floor_program);
            self.gl.delete_vertex_array(self.floor_vao);
            self.gl.delete_buffer(self.floor_vbo);
            self.gl.delete_texture(self.floor_texture);
            self.gl.delete_program(self.sprite_program);
            self.gl.delete_vertex_array(self.sprite_vao);
            self.gl.delete_buffer(self.sprite_vbo);
            self.gl.delete_buffer(self.sprite_instance_vbo);
        }
    }
}

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, mem::size_of_val(data)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_exact_multiple_fills_window() {
        assert_eq!(letterbox(960, 810, 320.0, 270.0), [0, 0, 960, 810]);
    }

    #[test]
    fn test_letterbox_wide_window_pillarboxes() {
        // 1920x810 keeps the 3x height, centred horizontally
        assert_eq!(letterbox(1920, 810, 320.0, 270.0), [480, 0, 960, 810]);
    }

    #[test]
    fn test_letterbox_tall_window_adds_bars() {
        assert_eq!(letterbox(640, 1000, 320.0, 270.0), [0, 230, 640, 540]);
    }
}
