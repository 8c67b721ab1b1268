use crate::io::{ConfigurablePrintTarget, PrintTarget};
use crate::{
    algebra::*,
    solver::core::cones::{SupportedConeAsTag, SupportedConeTag},
};
use std::io::Write;

use super::*;
use crate::solver::core::{
    cones::{CompositeCone, Cone},
    traits::InfoPrint,
    DirectionMethod, LineSearchMethod,
};
use std::time::Duration;

impl<T> ConfigurablePrintTarget for DefaultInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const RULE: &str =
    "-----------------------------------------------------------------";

impl<T> InfoPrint<T> for DefaultInfo<T>
where
    T: FloatT,
{
    type D = DefaultProblemData<T>;
    type C = CompositeCone<T>;

    fn print_configuration(
        &mut self,
        settings: &DefaultSettings<T>,
        data: &DefaultProblemData<T>,
        cones: &CompositeCone<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;
        writeln!(
            out,
            "           conicls v{}  -  least squares conic solver",
            crate::VERSION
        )?;
        writeln!(out, "{}", RULE)?;

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", data.n)?;
        writeln!(out, "  constraints   = {}", data.m)?;
        writeln!(out, "  nnz(A)        = {}", data.A.nnz())?;
        writeln!(out, "  cones (total) = {}", cones.len())?;

        _print_conedims_by_type(out, cones, SupportedConeTag::ZeroCone)?;
        _print_conedims_by_type(out, cones, SupportedConeTag::NonnegativeCone)?;
        _print_conedims_by_type(out, cones, SupportedConeTag::SecondOrderCone)?;

        writeln!(out,)?;

        self.print_settings(settings)?;

        std::io::Result::Ok(())
    }

    fn print_status_header(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        if let (Some(rank), Some(nullity)) = (self.presolve_rank, self.presolve_nullity) {
            writeln!(out, "presolve: rank = {rank}, nullspace dimension = {nullity}\n")?;
        }

        //print a subheader for the iterations info
        write!(out, "iter    ")?;
        write!(out, "loss         ")?;
        write!(out, "|∇|∞        ")?;
        write!(out, "step       ")?;
        write!(out, "cg iters")?;
        writeln!(out,)?;
        writeln!(out, "{}", RULE)?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    fn print_status(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{}  ", expformat!("{:8.4e}", self.loss))?;
        write!(out, "{}  ", expformat!("{:8.4e}", self.grad_norm_inf))?;

        if self.iterations > 0 {
            write!(out, "{}  ", expformat!("{:>.2e}", self.step_length))?;
            write!(out, "{:>6}", self.cg_iterations)?;
        } else {
            write!(out, " ------     ------")?;
        }

        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    fn print_footer(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;

        if self.refinement_rounds > 0 || self.refinement_residual_after.is_finite() {
            writeln!(
                out,
                "refinement: {} rounds, residual {} -> {}",
                self.refinement_rounds,
                expformat!("{:.2e}", self.refinement_residual_before),
                expformat!("{:.2e}", self.refinement_residual_after)
            )?;
        }

        writeln!(
            out,
            "direction: {} calls, {} cg iterations, {} hessian products",
            self.direction_stats.calls,
            self.direction_stats.total_cg_iterations,
            self.direction_stats.hessian_matvecs
        )?;
        writeln!(
            out,
            "line search: {} calls, {} loss and {} gradient evaluations",
            self.linesearch_stats.calls,
            self.linesearch_stats.loss_evaluations,
            self.linesearch_stats.gradient_evaluations
        )?;

        write!(out, "Terminated with status = {}", self.status)?;
        if let Some(stage) = self.error_stage {
            write!(out, " (stage: {stage}")?;
            if let Some(iter) = self.error_iteration {
                write!(out, ", iteration {iter}")?;
            }
            write!(out, ")")?;
        }
        writeln!(out,)?;

        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;

        std::io::Result::Ok(())
    }
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    fn print_settings(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;

        let set = settings;

        writeln!(out, "settings:")?;

        writeln!(
            out,
            "  precision: {} bit, qr presolve: {}",
            _get_precision_string::<T>(),
            _bool_on_off(set.qr_presolve)
        )?;

        let time_lim_str = {
            if set.time_limit.is_infinite() {
                "Inf".to_string()
            } else {
                format!("{:?}", set.time_limit)
            }
        };
        writeln!(
            out,
            "  max iter = {}, time limit = {}",
            set.outer_iteration_cap, time_lim_str
        )?;

        writeln!(
            out,
            "  tol_gradient = {:.1e}, tol_loss = {:.1e}, tol_stall = {:.1e}",
            set.tol_gradient, set.tol_loss, set.tol_stall_loss
        )?;

        let direction = match set.direction_method {
            DirectionMethod::CgNewton => "newton-cg",
            DirectionMethod::DenseNewton => "dense newton",
        };
        writeln!(
            out,
            "  direction: {}, reg floor = {:.1e}, warm start: {}",
            direction,
            set.cg_regularization_floor,
            _bool_on_off(set.cg_warm_start)
        )?;

        let linesearch = match set.line_search_method {
            LineSearchMethod::Backtracking => "backtracking",
            LineSearchMethod::LinSpaceGrid => "linear grid",
            LineSearchMethod::LogSpaceGrid => "log grid",
            LineSearchMethod::StrongWolfe => "strong wolfe",
        };
        writeln!(
            out,
            "  line search: {}, armijo = {:.1e}, curvature = {:.1}",
            linesearch, set.linesearch_armijo, set.linesearch_curvature
        )?;

        writeln!(
            out,
            "  equilibrate: {}, min_scale = {:.1e}, max_scale = {:.1e}",
            _bool_on_off(set.equilibrate_enable),
            set.equilibrate_min_scaling,
            set.equilibrate_max_scaling
        )?;

        writeln!(
            out,
            "               max iter = {}",
            set.max_equilibration_iters,
        )?;

        writeln!(
            out,
            "  refinement: rounds = {}, min τ = {:.1e}",
            set.refinement_rounds, set.refinement_min_tau
        )?;

        writeln!(out,)?;

        std::io::Result::Ok(())
    }
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

fn _print_conedims_by_type<T: FloatT>(
    out: &mut PrintTarget,
    cones: &CompositeCone<T>,
    conetag: SupportedConeTag,
) -> std::io::Result<()> {
    let maxlistlen = 5;

    let count = cones.get_type_count(conetag);

    //skip if there are none of this type
    if count == 0 {
        return std::io::Result::Ok(());
    }

    // drops trailing "Cone" part of name
    let name = conetag.as_str();
    let name = &name[0..name.len() - 4];
    let name = format!("{name:>11}");

    let nvars: Vec<usize> = cones
        .iter()
        .filter(|cone| cone.as_tag() == conetag)
        .map(|cone| cone.numel())
        .collect();

    write!(out, "    : {name} = {count}, ")?;

    if count == 1 {
        write!(out, " numel = {}", nvars[0])?;
    } else if count <= maxlistlen {
        write!(out, " numel = (")?;
        for nvar in nvars.iter().take(nvars.len() - 1) {
            write!(out, "{nvar},")?;
        }
        write!(out, "{})", nvars[nvars.len() - 1])?;
    } else {
        // first (maxlistlen-1) and the final one
        write!(out, " numel = (")?;
        for nvar in nvars.iter().take(maxlistlen - 1) {
            write!(out, "{nvar},")?;
        }
        write!(out, "...,{})", nvars[nvars.len() - 1])?;
    }

    writeln!(out,)?;

    std::io::Result::Ok(())
}

// convert a string in LowerExp display format into one that
// always has a sign and at least two digits in the exponent
fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');

    let has_short_exp = {
        if !has_sign {
            thestr.len() == eidx + 2
        } else {
            thestr.len() == eidx + 3
        }
    };

    let chars = match (has_sign, has_short_exp) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e-3)), "1.50e-03");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 2.0e12)), "2.00e+12");
    assert_eq!(_exp_str_reformat(format!("{:.1e}", 3.0)), "3.0e+00");
    assert_eq!(_exp_str_reformat("nan".to_string()), "nan");
}
