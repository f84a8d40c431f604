//! Frame plans.
//!
//! A frame is an ordered list of [`Command`]s. The plans of both demos are
//! built here without touching GL, executed verbatim by the client, and
//! replayed by [`StateTracker`] so the pass ordering can be checked.

use std::fmt;

use glam::{Mat4, Vec3};

use crate::transform;

/// Render destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The window's framebuffer.
    Default,
    /// The color + depth/stencil offscreen target.
    Offscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    StencilTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Always,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilAction {
    Keep,
    Replace,
}

/// Buffers affected by a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearMask {
    pub const COLOR: ClearMask = ClearMask { color: true, depth: false, stencil: false };
    pub const COLOR_DEPTH: ClearMask = ClearMask { color: true, depth: true, stencil: false };
    pub const STENCIL: ClearMask = ClearMask { color: false, depth: false, stencil: true };
}

/// Shader programs used by the demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramId {
    Blend,
    Scene,
    Screen,
}

/// Vertex ranges that can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// Indexed quad of the blend demo.
    Quad,
    Cube,
    Floor,
    ScreenQuad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Primary,
    Secondary,
    OffscreenColor,
}

/// What a draw call is for. Only used to check plans; GL never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawRole {
    Subject,
    Floor,
    Reflection,
    Present,
}

impl fmt::Display for DrawRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawRole::Subject => "subject",
            DrawRole::Floor => "floor",
            DrawRole::Reflection => "reflection",
            DrawRole::Present => "present",
        };
        f.write_str(name)
    }
}

/// One GL operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    BindTarget(Target),
    UseProgram(ProgramId),
    BindTexture { unit: u32, texture: TextureSlot },
    Enable(Capability),
    Disable(Capability),
    ClearColor([f32; 4]),
    Clear(ClearMask),
    StencilFunc { func: CompareFunc, reference: i32, mask: u32 },
    StencilOp { stencil_fail: StencilAction, depth_fail: StencilAction, pass: StencilAction },
    StencilMask(u32),
    DepthMask(bool),
    /// Sets the `model` uniform of the current program.
    SetModel(Mat4),
    /// Sets the `overrideColor` uniform of the current program.
    SetOverrideColor(Vec3),
    Draw { geometry: Geometry, role: DrawRole },
}

/// Ordered commands of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    commands: Vec<Command>,
}

impl FramePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<Command> for FramePlan {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FramePlan {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Clear color of the blend demo.
pub const BLEND_CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Clear color of the offscreen scene.
pub const SCENE_CLEAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Stencil value the floor writes and the reflection tests for.
pub const FLOOR_STENCIL: i32 = 1;
/// Tint applied to the reflected cube.
pub const REFLECTION_TINT: Vec3 = Vec3::splat(0.3);

/// Frame of the blend-and-pulse demo at `elapsed` seconds.
pub fn blend_pulse_frame(elapsed: f32) -> FramePlan {
    use Command::*;

    [
        ClearColor(BLEND_CLEAR),
        Clear(ClearMask::COLOR),
        UseProgram(ProgramId::Blend),
        BindTexture { unit: 0, texture: TextureSlot::Primary },
        BindTexture { unit: 1, texture: TextureSlot::Secondary },
        SetModel(transform::pulse_model(elapsed)),
        Draw { geometry: Geometry::Quad, role: DrawRole::Subject },
    ]
    .into_iter()
    .collect()
}

/// Frame of the offscreen pipeline at `elapsed` seconds.
///
/// The scene pass draws the cube, marks the floor in the stencil buffer
/// without writing depth, then draws the darkened mirrored cube only where
/// the stencil is set. The present pass blurs the offscreen color texture
/// onto the window.
pub fn offscreen_frame(elapsed: f32) -> FramePlan {
    use Command::*;

    let model = transform::spin_model(elapsed);

    [
        // scene pass
        BindTarget(Target::Offscreen),
        Enable(Capability::DepthTest),
        UseProgram(ProgramId::Scene),
        BindTexture { unit: 0, texture: TextureSlot::Primary },
        BindTexture { unit: 1, texture: TextureSlot::Secondary },
        ClearColor(SCENE_CLEAR),
        Clear(ClearMask::COLOR_DEPTH),
        SetModel(model),
        Draw { geometry: Geometry::Cube, role: DrawRole::Subject },
        Enable(Capability::StencilTest),
        // floor: set stencil to 1 wherever it lands, keep depth untouched
        StencilFunc { func: CompareFunc::Always, reference: FLOOR_STENCIL, mask: 0xFF },
        StencilOp {
            stencil_fail: StencilAction::Keep,
            depth_fail: StencilAction::Keep,
            pass: StencilAction::Replace,
        },
        StencilMask(0xFF),
        DepthMask(false),
        Clear(ClearMask::STENCIL),
        Draw { geometry: Geometry::Floor, role: DrawRole::Floor },
        // reflection: only where the floor was drawn
        StencilFunc { func: CompareFunc::Equal, reference: FLOOR_STENCIL, mask: 0xFF },
        StencilMask(0x00),
        DepthMask(true),
        SetModel(transform::reflected(model)),
        SetOverrideColor(REFLECTION_TINT),
        Draw { geometry: Geometry::Cube, role: DrawRole::Reflection },
        SetOverrideColor(Vec3::ONE),
        Disable(Capability::StencilTest),
        // present pass
        BindTarget(Target::Default),
        Disable(Capability::DepthTest),
        UseProgram(ProgramId::Screen),
        BindTexture { unit: 0, texture: TextureSlot::OffscreenColor },
        Draw { geometry: Geometry::ScreenQuad, role: DrawRole::Present },
    ]
    .into_iter()
    .collect()
}

/// Depth and stencil state as GL sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineState {
    pub depth_test: bool,
    pub stencil_test: bool,
    pub stencil_func: CompareFunc,
    pub stencil_ref: i32,
    pub stencil_read_mask: u32,
    pub stencil_pass: StencilAction,
    pub stencil_write_mask: u32,
    pub depth_write: bool,
}

impl Default for PipelineState {
    /// GL's initial state.
    fn default() -> Self {
        Self {
            depth_test: false,
            stencil_test: false,
            stencil_func: CompareFunc::Always,
            stencil_ref: 0,
            stencil_read_mask: u32::MAX,
            stencil_pass: StencilAction::Keep,
            stencil_write_mask: u32::MAX,
            depth_write: true,
        }
    }
}

/// A draw call together with the state it ran under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    /// Index of the draw command within its plan.
    pub command: usize,
    pub geometry: Geometry,
    pub role: DrawRole,
    pub target: Target,
    pub program: Option<ProgramId>,
    pub state: PipelineState,
    pub model: Mat4,
    pub override_color: Vec3,
    pub textures: [Option<TextureSlot>; 2],
}

/// Follows GL state across commands. State persists across plans, like the
/// real context does between frames.
#[derive(Debug, Clone)]
pub struct StateTracker {
    target: Target,
    program: Option<ProgramId>,
    state: PipelineState,
    model: Mat4,
    override_color: Vec3,
    textures: [Option<TextureSlot>; 2],
    stencil_clear_masked: Option<usize>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            target: Target::Default,
            program: None,
            state: PipelineState::default(),
            model: Mat4::IDENTITY,
            override_color: Vec3::ONE,
            textures: [None; 2],
            stencil_clear_masked: None,
        }
    }
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Applies every command of `plan` and returns its draws in order.
    pub fn replay(&mut self, plan: &FramePlan) -> Vec<DrawRecord> {
        self.stencil_clear_masked = None;
        let mut draws = Vec::new();
        for (index, command) in plan.commands().iter().enumerate() {
            if let Some(record) = self.apply(index, command) {
                draws.push(record);
            }
        }
        draws
    }

    fn apply(&mut self, index: usize, command: &Command) -> Option<DrawRecord> {
        match *command {
            Command::BindTarget(target) => self.target = target,
            Command::UseProgram(program) => self.program = Some(program),
            Command::BindTexture { unit, texture } => {
                if let Some(slot) = self.textures.get_mut(unit as usize) {
                    *slot = Some(texture);
                }
            }
            Command::Enable(cap) => self.set_capability(cap, true),
            Command::Disable(cap) => self.set_capability(cap, false),
            Command::ClearColor(_) => {}
            Command::Clear(mask) => {
                if mask.stencil && self.state.stencil_write_mask & 0xFF != 0xFF {
                    self.stencil_clear_masked.get_or_insert(index);
                }
            }
            Command::StencilFunc { func, reference, mask } => {
                self.state.stencil_func = func;
                self.state.stencil_ref = reference;
                self.state.stencil_read_mask = mask;
            }
            Command::StencilOp { pass, .. } => self.state.stencil_pass = pass,
            Command::StencilMask(mask) => self.state.stencil_write_mask = mask,
            Command::DepthMask(write) => self.state.depth_write = write,
            Command::SetModel(model) => self.model = model,
            Command::SetOverrideColor(color) => self.override_color = color,
            Command::Draw { geometry, role } => {
                return Some(DrawRecord {
                    command: index,
                    geometry,
                    role,
                    target: self.target,
                    program: self.program,
                    state: self.state,
                    model: self.model,
                    override_color: self.override_color,
                    textures: self.textures,
                });
            }
        }
        None
    }

    fn set_capability(&mut self, cap: Capability, on: bool) {
        match cap {
            Capability::DepthTest => self.state.depth_test = on,
            Capability::StencilTest => self.state.stencil_test = on,
        }
    }
}

/// Ways a frame plan can break the stencil reflection.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    MissingDraw(DrawRole),
    /// The reflection was drawn before the floor marked the stencil buffer.
    ReflectionBeforeFloor,
    StencilTestDisabled { role: DrawRole, command: usize },
    StencilFunc { role: DrawRole, command: usize, found: CompareFunc },
    StencilRef { role: DrawRole, command: usize, found: i32 },
    /// The floor does not replace the stencil value where it passes.
    StencilPass { role: DrawRole, command: usize, found: StencilAction },
    StencilWrite { role: DrawRole, command: usize, found: u32 },
    DepthWrite { role: DrawRole, command: usize, found: bool },
    WrongTarget { role: DrawRole, command: usize, found: Target },
    /// A stencil clear ran while the stencil write mask hid some bits.
    StencilClearMasked { command: usize },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MissingDraw(role) => write!(f, "plan has no {role} draw"),
            PlanError::ReflectionBeforeFloor => {
                write!(f, "reflection is drawn before the floor marks the stencil")
            }
            PlanError::StencilTestDisabled { role, command } => {
                write!(f, "{role} draw (command {command}) runs with the stencil test disabled")
            }
            PlanError::StencilFunc { role, command, found } => {
                write!(f, "{role} draw (command {command}) uses stencil func {found:?}")
            }
            PlanError::StencilRef { role, command, found } => {
                write!(f, "{role} draw (command {command}) uses stencil reference {found}")
            }
            PlanError::StencilPass { role, command, found } => {
                write!(f, "{role} draw (command {command}) has stencil pass op {found:?}")
            }
            PlanError::StencilWrite { role, command, found } => {
                write!(f, "{role} draw (command {command}) has stencil write mask {found:#x}")
            }
            PlanError::DepthWrite { role, command, found } => {
                write!(f, "{role} draw (command {command}) has depth writes set to {found}")
            }
            PlanError::WrongTarget { role, command, found } => {
                write!(f, "{role} draw (command {command}) renders into {found:?}")
            }
            PlanError::StencilClearMasked { command } => {
                write!(f, "stencil clear (command {command}) runs under a partial write mask")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Checks the stencil/depth discipline of an offscreen frame.
///
/// The plan is replayed twice on one tracker so state left over from the
/// previous frame is taken into account.
pub fn validate_reflection(plan: &FramePlan) -> Result<(), PlanError> {
    let mut tracker = StateTracker::new();
    tracker.replay(plan);
    let draws = tracker.replay(plan);

    if let Some(command) = tracker.stencil_clear_masked {
        return Err(PlanError::StencilClearMasked { command });
    }

    let of_role = |role: DrawRole| draws.iter().filter(move |d| d.role == role);
    for role in [DrawRole::Floor, DrawRole::Reflection, DrawRole::Present] {
        if of_role(role).next().is_none() {
            return Err(PlanError::MissingDraw(role));
        }
    }

    let first_floor = of_role(DrawRole::Floor).map(|d| d.command).min();
    if of_role(DrawRole::Reflection).any(|d| Some(d.command) < first_floor) {
        return Err(PlanError::ReflectionBeforeFloor);
    }

    for draw in &draws {
        let expected = match draw.role {
            DrawRole::Present => Target::Default,
            _ => Target::Offscreen,
        };
        if draw.target != expected {
            return Err(PlanError::WrongTarget {
                role: draw.role,
                command: draw.command,
                found: draw.target,
            });
        }
    }

    for floor in of_role(DrawRole::Floor) {
        check_stencil(floor, CompareFunc::Always, Some(StencilAction::Replace), 0xFF, false)?;
    }
    for reflection in of_role(DrawRole::Reflection) {
        check_stencil(reflection, CompareFunc::Equal, None, 0x00, true)?;
    }
    Ok(())
}

/// Checks one draw against the expected stencil setup. `pass` is only
/// checked for draws that write the stencil buffer.
fn check_stencil(
    draw: &DrawRecord,
    func: CompareFunc,
    pass: Option<StencilAction>,
    write_mask: u32,
    depth_write: bool,
) -> Result<(), PlanError> {
    let (role, command, state) = (draw.role, draw.command, draw.state);
    if !state.stencil_test {
        return Err(PlanError::StencilTestDisabled { role, command });
    }
    if state.stencil_func != func {
        return Err(PlanError::StencilFunc { role, command, found: state.stencil_func });
    }
    if state.stencil_ref != FLOOR_STENCIL {
        return Err(PlanError::StencilRef { role, command, found: state.stencil_ref });
    }
    if pass.is_some_and(|pass| state.stencil_pass != pass) {
        return Err(PlanError::StencilPass { role, command, found: state.stencil_pass });
    }
    if state.stencil_write_mask & 0xFF != write_mask {
        return Err(PlanError::StencilWrite { role, command, found: state.stencil_write_mask });
    }
    if state.depth_write != depth_write {
        return Err(PlanError::DepthWrite { role, command, found: state.depth_write });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws_of(plan: &FramePlan) -> Vec<DrawRecord> {
        StateTracker::new().replay(plan)
    }

    #[test]
    fn test_blend_frame_draws_quad_once() {
        let plan = blend_pulse_frame(0.0);
        let draws = draws_of(&plan);
        assert_eq!(draws.len(), 1);
        let quad = &draws[0];
        assert_eq!(quad.geometry, Geometry::Quad);
        assert_eq!(quad.program, Some(ProgramId::Blend));
        assert_eq!(quad.textures, [Some(TextureSlot::Primary), Some(TextureSlot::Secondary)]);
        assert_eq!(quad.model, transform::pulse_model(0.0));
    }

    #[test]
    fn test_offscreen_frame_is_valid() {
        for t in [0.0, 0.1, 1.7, 42.0] {
            assert_eq!(validate_reflection(&offscreen_frame(t)), Ok(()));
        }
    }

    #[test]
    fn test_offscreen_frame_draw_order() {
        let draws = draws_of(&offscreen_frame(0.5));
        let roles: Vec<_> = draws.iter().map(|d| d.role).collect();
        assert_eq!(
            roles,
            vec![DrawRole::Subject, DrawRole::Floor, DrawRole::Reflection, DrawRole::Present]
        );
        let geometry: Vec<_> = draws.iter().map(|d| d.geometry).collect();
        assert_eq!(
            geometry,
            vec![Geometry::Cube, Geometry::Floor, Geometry::Cube, Geometry::ScreenQuad]
        );
    }

    #[test]
    fn test_reflection_is_darkened_and_mirrored() {
        let t = 0.25;
        let draws = draws_of(&offscreen_frame(t));
        let subject = draws[0];
        let reflection = draws[2];
        assert_eq!(subject.override_color, Vec3::ONE);
        assert_eq!(reflection.override_color, REFLECTION_TINT);
        assert_eq!(reflection.model, transform::reflected(transform::spin_model(t)));
        assert_eq!(reflection.program, Some(ProgramId::Scene));
    }

    #[test]
    fn test_present_pass_samples_offscreen_color() {
        let draws = draws_of(&offscreen_frame(0.0));
        let present = draws.last().unwrap();
        assert_eq!(present.target, Target::Default);
        assert_eq!(present.program, Some(ProgramId::Screen));
        assert_eq!(present.textures[0], Some(TextureSlot::OffscreenColor));
        assert!(!present.state.depth_test);
        assert!(!present.state.stencil_test);
    }

    #[test]
    fn test_frame_leaves_override_color_white() {
        let mut tracker = StateTracker::new();
        tracker.replay(&offscreen_frame(0.0));
        let second = tracker.replay(&offscreen_frame(0.0));
        assert_eq!(second[0].override_color, Vec3::ONE);
        assert!(!tracker.state().stencil_test);
    }

    fn without(plan: &FramePlan, skip: impl Fn(usize, &Command) -> bool) -> FramePlan {
        plan.commands()
            .iter()
            .enumerate()
            .filter(|(i, c)| !skip(*i, *c))
            .map(|(_, c)| *c)
            .collect()
    }

    fn reflection_index(plan: &FramePlan) -> usize {
        plan.commands()
            .iter()
            .position(|c| matches!(c, Command::Draw { role: DrawRole::Reflection, .. }))
            .unwrap()
    }

    #[test]
    fn test_disabling_stencil_before_reflection_is_rejected() {
        let plan = offscreen_frame(0.0);
        let at = reflection_index(&plan);
        let mut commands = plan.commands().to_vec();
        commands.insert(at, Command::Disable(Capability::StencilTest));
        let broken: FramePlan = commands.into_iter().collect();

        assert_eq!(
            validate_reflection(&broken),
            Err(PlanError::StencilTestDisabled {
                role: DrawRole::Reflection,
                command: at + 1,
            })
        );
    }

    #[test]
    fn test_reflection_writing_stencil_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken = without(&plan, |_, c| *c == Command::StencilMask(0x00));
        assert!(matches!(
            validate_reflection(&broken),
            Err(PlanError::StencilWrite { role: DrawRole::Reflection, found: 0xFF, .. })
        ));
    }

    #[test]
    fn test_floor_writing_depth_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken = without(&plan, |_, c| *c == Command::DepthMask(false));
        assert!(matches!(
            validate_reflection(&broken),
            Err(PlanError::DepthWrite { role: DrawRole::Floor, found: true, .. })
        ));
    }

    #[test]
    fn test_reflection_without_equal_func_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken = without(&plan, |_, c| {
            matches!(c, Command::StencilFunc { func: CompareFunc::Equal, .. })
        });
        assert!(matches!(
            validate_reflection(&broken),
            Err(PlanError::StencilFunc { role: DrawRole::Reflection, found: CompareFunc::Always, .. })
        ));
    }

    #[test]
    fn test_stencil_clear_needs_full_write_mask() {
        // Without re-enabling stencil writes, the next frame's stencil clear
        // runs under the reflection's zero mask.
        let plan = offscreen_frame(0.0);
        let broken = without(&plan, |_, c| *c == Command::StencilMask(0xFF));
        assert!(matches!(
            validate_reflection(&broken),
            Err(PlanError::StencilClearMasked { .. })
        ));
    }

    #[test]
    fn test_every_reflection_draw_is_checked() {
        let plan = offscreen_frame(0.0);
        let stencil_off = plan
            .commands()
            .iter()
            .position(|c| *c == Command::Disable(Capability::StencilTest))
            .unwrap();
        let mut commands = plan.commands().to_vec();
        commands.insert(
            stencil_off + 1,
            Command::Draw { geometry: Geometry::Cube, role: DrawRole::Reflection },
        );
        let broken: FramePlan = commands.into_iter().collect();

        assert_eq!(
            validate_reflection(&broken),
            Err(PlanError::StencilTestDisabled {
                role: DrawRole::Reflection,
                command: stencil_off + 1,
            })
        );
    }

    #[test]
    fn test_floor_that_keeps_stencil_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken: FramePlan = plan
            .commands()
            .iter()
            .map(|c| match c {
                Command::StencilOp { .. } => Command::StencilOp {
                    stencil_fail: StencilAction::Keep,
                    depth_fail: StencilAction::Keep,
                    pass: StencilAction::Keep,
                },
                other => *other,
            })
            .collect();

        assert!(matches!(
            validate_reflection(&broken),
            Err(PlanError::StencilPass { role: DrawRole::Floor, found: StencilAction::Keep, .. })
        ));
    }

    #[test]
    fn test_mismatched_stencil_reference_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken: FramePlan = plan
            .commands()
            .iter()
            .map(|c| match *c {
                Command::StencilFunc { func: CompareFunc::Equal, mask, .. } => {
                    Command::StencilFunc { func: CompareFunc::Equal, reference: 2, mask }
                }
                other => other,
            })
            .collect();

        assert_eq!(
            validate_reflection(&broken),
            Err(PlanError::StencilRef {
                role: DrawRole::Reflection,
                command: reflection_index(&plan),
                found: 2,
            })
        );
    }

    #[test]
    fn test_missing_present_is_rejected() {
        let plan = offscreen_frame(0.0);
        let broken = without(&plan, |_, c| {
            matches!(c, Command::Draw { role: DrawRole::Present, .. })
        });
        assert_eq!(validate_reflection(&broken), Err(PlanError::MissingDraw(DrawRole::Present)));
    }
}
