use crate::dates::DateKey;
use crate::store::{WIPE_FINAL_PROMPT, WIPE_PROMPT};

pub fn render_index(today: DateKey) -> String {
    INDEX_HTML
        .replace("{{TODAY}}", &today.as_key())
        .replace("{{TODAY_LABEL}}", &today.display_label())
        .replace("{{WIPE_PROMPT}}", &js_string(WIPE_PROMPT))
        .replace("{{WIPE_FINAL_PROMPT}}", &js_string(WIPE_FINAL_PROMPT))
}

/// Quoted and escaped for use as a JS string literal.
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "''".to_string())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Goal Tracker</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --muted: #6b675f;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --success: #3a9d6e;
      --warning: #e0a030;
      --danger: #d9534f;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    button {
      font: inherit;
      border: none;
      border-radius: 12px;
      padding: 8px 14px;
      cursor: pointer;
      background: var(--accent-2);
      color: #fff;
    }

    button.ghost {
      background: transparent;
      color: var(--accent-2);
      border: 1px solid rgba(47, 72, 88, 0.3);
    }

    button.danger {
      background: var(--danger);
    }

    .tabs {
      display: flex;
      gap: 8px;
    }

    .tabs button.active {
      background: var(--accent);
    }

    .tab-content {
      display: none;
      gap: 16px;
    }

    .tab-content.active {
      display: grid;
    }

    .day-nav,
    .period-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .today-badge {
      margin-left: 8px;
      font-size: 0.75rem;
      background: var(--accent);
      color: #fff;
      border-radius: 999px;
      padding: 2px 8px;
    }

    .goal-card {
      background: #fff;
      border-radius: 18px;
      padding: 16px 18px;
      display: grid;
      gap: 12px;
      box-shadow: 0 8px 24px rgba(47, 72, 88, 0.08);
    }

    .goal-header,
    .goal-input,
    .goal-stats {
      display: flex;
      align-items: center;
      gap: 12px;
      flex-wrap: wrap;
    }

    .goal-header {
      justify-content: space-between;
    }

    .goal-header h3 {
      margin: 0;
    }

    .badge {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .status {
      font-weight: 600;
      width: 32px;
      height: 32px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      color: #fff;
    }

    .achieved { background: var(--success); }
    .partial { background: var(--warning); }
    .missed { background: var(--danger); }

    .flag.selected-yes { background: var(--success); }
    .flag.selected-no { background: var(--danger); }

    input, select {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.25);
    }

    .time-input {
      width: 90px;
    }

    .empty {
      text-align: center;
      color: var(--muted);
      padding: 24px;
    }

    .history-stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .history-stat {
      background: #fff;
      border-radius: 16px;
      padding: 12px;
      text-align: center;
    }

    .history-stat strong {
      display: block;
      font-size: 1.6rem;
    }

    .calendar,
    .mini-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .calendar-day {
      border-radius: 10px;
      padding: 6px;
      min-height: 52px;
      color: #fff;
      cursor: pointer;
    }

    .calendar-day.blank {
      background: transparent;
      cursor: default;
    }

    .calendar-day.today {
      outline: 3px solid var(--accent-2);
    }

    .year-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    .mini-grid {
      gap: 3px;
    }

    .mini-day {
      height: 14px;
      border-radius: 3px;
    }

    .mini-day.blank {
      background: transparent;
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(43, 42, 40, 0.45);
      display: none;
      place-items: center;
    }

    .overlay.active {
      display: grid;
    }

    .modal {
      background: #fff;
      border-radius: 20px;
      padding: 24px;
      width: min(420px, 92vw);
      display: grid;
      gap: 14px;
    }

    .toast {
      position: fixed;
      bottom: 24px;
      left: 50%;
      transform: translateX(-50%);
      padding: 10px 18px;
      border-radius: 999px;
      background: var(--accent-2);
      color: #fff;
      opacity: 0;
      transition: opacity 200ms ease;
    }

    .toast.show {
      opacity: 1;
    }

    .toast.error {
      background: var(--danger);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Goal Tracker</h1>
      <div class="tabs">
        <button data-tab="today" class="active">Today</button>
        <button data-tab="history">History</button>
        <button id="settings-btn" class="ghost">Settings</button>
      </div>
    </header>

    <section id="today-tab" class="tab-content active">
      <div class="day-nav">
        <button id="prev-day" class="ghost">&larr;</button>
        <div id="current-date">{{TODAY_LABEL}}</div>
        <button id="next-day" class="ghost">&rarr;</button>
      </div>
      <div id="goals-list"></div>
      <button id="add-goal-btn">+ Add goal</button>
    </section>

    <section id="history-tab" class="tab-content">
      <select id="history-goal"></select>
      <div id="history-empty" class="empty">Pick a goal to see its history.</div>
      <div id="history-content" hidden>
        <div class="tabs">
          <button class="view-mode active" data-mode="month">Month</button>
          <button class="view-mode" data-mode="year">Year</button>
        </div>
        <div class="period-nav">
          <button id="prev-period" class="ghost">&larr;</button>
          <strong id="period-label"></strong>
          <button id="next-period" class="ghost">&rarr;</button>
        </div>
        <div id="history-stats" class="history-stats"></div>
        <div id="calendar-view"></div>
      </div>
    </section>
  </main>

  <div id="goal-overlay" class="overlay">
    <form id="goal-form" class="modal">
      <h2 id="goal-form-title">New goal</h2>
      <input id="goal-name" placeholder="Goal name" autocomplete="off" />
      <select id="goal-type">
        <option value="time">Time (minutes)</option>
        <option value="boolean">Done / not done</option>
      </select>
      <input id="goal-target" type="number" min="1" placeholder="Target minutes" />
      <div class="goal-header">
        <button type="button" id="goal-cancel" class="ghost">Cancel</button>
        <button type="submit" id="goal-submit">Add</button>
      </div>
    </form>
  </div>

  <div id="settings-overlay" class="overlay">
    <div class="modal">
      <h2>Data</h2>
      <button id="export-btn">Export backup</button>
      <button id="import-btn">Import backup</button>
      <input id="import-file" type="file" accept="application/json" hidden />
      <button id="wipe-btn" class="danger">Delete all data</button>
      <button id="settings-close" class="ghost">Close</button>
    </div>
  </div>

  <div id="toast" class="toast"></div>

  <script>
    const SYMBOLS = { achieved: '○', partial: '△', missed: '×' };
    const WEEKDAYS = ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat'];

    let selectedDate = '{{TODAY}}';
    let historyDate = '{{TODAY}}';
    let historyMode = 'month';
    let historyGoalId = null;
    let editingGoalId = null;
    let goalsCache = [];

    const $ = (id) => document.getElementById(id);

    const toast = (message, type) => {
      const el = $('toast');
      el.textContent = message;
      el.className = 'toast show ' + (type || '');
      setTimeout(() => el.classList.remove('show'), 3000);
    };

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' })[ch]);

    const formatMinutes = (total) => {
      const hours = Math.floor(total / 60);
      const minutes = total % 60;
      return hours > 0 ? `${hours}h ${minutes}m` : `${minutes}m`;
    };

    const api = async (method, url, body, raw) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        if (raw) {
          options.body = body;
        } else {
          options.headers['content-type'] = 'application/json';
          options.body = JSON.stringify(body);
        }
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      if (res.status === 204) {
        return null;
      }
      return res.json();
    };

    const renderDay = (day) => {
      selectedDate = day.date;
      goalsCache = day.goals.map((entry) => entry.goal);
      $('current-date').innerHTML =
        escapeHtml(day.label) + (day.is_today ? '<span class="today-badge">Today</span>' : '');
      $('prev-day').dataset.date = day.previous || '';
      $('next-day').dataset.date = day.next || '';

      const list = $('goals-list');
      if (!day.goals.length) {
        list.innerHTML = '<div class="empty">No goals yet. Add one to get started.</div>';
        return;
      }

      list.innerHTML = day.goals.map(({ goal, value, status, stats }) => {
        const id = escapeHtml(goal.id);
        let input;
        if (goal.type === 'time') {
          const current = typeof value === 'number' ? value : '';
          input = `<input type="number" min="0" class="time-input" data-goal-id="${id}" value="${current}" placeholder="0" />
            <span>min / target ${goal.targetTime} min</span>
            <span class="status ${status}">${SYMBOLS[status]}</span>`;
        } else {
          input = `<button class="flag ${value === true ? 'selected-yes' : ''}" data-goal-id="${id}" data-value="true">${SYMBOLS.achieved}</button>
            <button class="flag ${value === false ? 'selected-no' : ''}" data-goal-id="${id}" data-value="false">${SYMBOLS.missed}</button>`;
        }
        let statsHtml = `<span>Streak <strong>${stats.streak}</strong></span><span>Achieved <strong>${stats.total_achieved}</strong></span>`;
        if (goal.type === 'time') {
          statsHtml += `<span>Total <strong>${formatMinutes(stats.total_minutes)}</strong></span>`;
        }
        return `<div class="goal-card">
          <div class="goal-header">
            <div><h3>${escapeHtml(goal.name)}</h3><span class="badge">${goal.type === 'time' ? 'Time' : 'Check'}</span></div>
            <div><button class="ghost edit-goal" data-goal-id="${id}">Edit</button>
            <button class="ghost delete-goal" data-goal-id="${id}">Delete</button></div>
          </div>
          <div class="goal-input">${input}</div>
          <div class="goal-stats">${statsHtml}</div>
        </div>`;
      }).join('');

      list.querySelectorAll('.time-input').forEach((el) => {
        el.addEventListener('change', () => {
          const value = el.value === '' ? null : parseInt(el.value, 10);
          saveRecord(el.dataset.goalId, value);
        });
      });
      list.querySelectorAll('.flag').forEach((el) => {
        el.addEventListener('click', () => saveRecord(el.dataset.goalId, el.dataset.value === 'true'));
      });
      list.querySelectorAll('.edit-goal').forEach((el) => {
        el.addEventListener('click', () => openGoalForm(goalsCache.find((goal) => goal.id === el.dataset.goalId)));
      });
      list.querySelectorAll('.delete-goal').forEach((el) => {
        el.addEventListener('click', () => deleteGoal(el.dataset.goalId));
      });
    };

    const loadDay = async (date) => {
      renderDay(await api('GET', `/api/day?date=${encodeURIComponent(date)}`));
      populateHistorySelect();
    };

    const saveRecord = async (goalId, value) => {
      try {
        await api('PUT', `/api/goals/${encodeURIComponent(goalId)}/records/${selectedDate}`, { value });
        await loadDay(selectedDate);
      } catch (err) {
        toast(err.message, 'error');
      }
    };

    const deleteGoal = async (goalId) => {
      const goal = goalsCache.find((item) => item.id === goalId);
      if (!goal || !confirm(`Delete "${goal.name}"?\nAll of its records will be deleted too.`)) {
        return;
      }
      try {
        await api('DELETE', `/api/goals/${encodeURIComponent(goalId)}`);
        if (historyGoalId === goalId) {
          historyGoalId = null;
        }
        await loadDay(selectedDate);
        await loadHistory();
      } catch (err) {
        toast(err.message, 'error');
      }
    };

    const openGoalForm = (goal) => {
      editingGoalId = goal ? goal.id : null;
      $('goal-form').reset();
      $('goal-form-title').textContent = goal ? 'Edit goal' : 'New goal';
      $('goal-submit').textContent = goal ? 'Update' : 'Add';
      $('goal-name').value = goal ? goal.name : '';
      $('goal-type').value = goal ? goal.type : 'time';
      $('goal-target').value = goal && goal.targetTime ? goal.targetTime : '';
      syncTargetField();
      $('goal-overlay').classList.add('active');
    };

    const closeGoalForm = () => {
      $('goal-overlay').classList.remove('active');
      editingGoalId = null;
    };

    const syncTargetField = () => {
      $('goal-target').hidden = $('goal-type').value !== 'time';
    };

    $('goal-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const name = $('goal-name').value.trim();
      const type = $('goal-type').value;
      const target = parseInt($('goal-target').value, 10);
      if (!name) {
        return;
      }
      if (type === 'time' && !(target > 0)) {
        alert('Enter a target time in minutes');
        return;
      }
      const payload = { name, type, target_time: type === 'time' ? target : null };
      try {
        if (editingGoalId) {
          await api('PUT', `/api/goals/${encodeURIComponent(editingGoalId)}`, payload);
        } else {
          await api('POST', '/api/goals', payload);
        }
        closeGoalForm();
        await loadDay(selectedDate);
        await loadHistory();
      } catch (err) {
        toast(err.message, 'error');
      }
    });

    const populateHistorySelect = () => {
      const select = $('history-goal');
      select.innerHTML = '<option value="">Select a goal...</option>' +
        goalsCache.map((goal) => `<option value="${escapeHtml(goal.id)}">${escapeHtml(goal.name)}</option>`).join('');
      select.value = historyGoalId || '';
    };

    const renderMonth = (month, goalType) => {
      const blanks = '<div class="calendar-day blank"></div>'.repeat(month.leading_blanks);
      const days = month.days.map((day) =>
        `<div class="calendar-day ${day.status} ${day.is_today ? 'today' : ''}" data-date="${day.date}">
          <div>${day.day}</div><div>${SYMBOLS[day.status]}</div>
        </div>`).join('');
      const legend = goalType === 'time' ? 'achieved / partial / missed' : 'achieved / missed';
      return `<p class="badge">${legend}</p>
        <div class="calendar">${WEEKDAYS.map((w) => `<strong>${w}</strong>`).join('')}${blanks}${days}</div>`;
    };

    const renderYear = (months) =>
      `<div class="year-grid">${months.map((month) =>
        `<div><strong>${escapeHtml(month.label)}</strong><div class="mini-grid">
          ${'<div class="mini-day blank"></div>'.repeat(month.leading_blanks)}
          ${month.days.map((day) => `<div class="mini-day ${day.status}" title="${day.date}"></div>`).join('')}
        </div></div>`).join('')}</div>`;

    const renderHistory = (view) => {
      historyDate = view.reference;
      $('period-label').textContent = view.label;
      $('prev-period').dataset.date = view.previous || '';
      $('next-period').dataset.date = view.next || '';

      let stats = `<div class="history-stat"><strong>${view.stats.achieved}</strong>Days achieved</div>
        <div class="history-stat"><strong>${view.stats.achievement_rate}%</strong>Achievement rate</div>`;
      if (view.goal.type === 'time') {
        stats += `<div class="history-stat"><strong>${formatMinutes(view.stats.total_minutes)}</strong>Total time</div>
          <div class="history-stat"><strong>${view.stats.partial}</strong>Partial days</div>`;
      }
      $('history-stats').innerHTML = stats;

      $('calendar-view').innerHTML = view.mode === 'month'
        ? renderMonth(view.months[0], view.goal.type)
        : renderYear(view.months);

      $('calendar-view').querySelectorAll('.calendar-day[data-date]').forEach((el) => {
        el.addEventListener('click', () => {
          showTab('today');
          loadDay(el.dataset.date).catch((err) => toast(err.message, 'error'));
        });
      });
    };

    const loadHistory = async () => {
      const hasGoal = Boolean(historyGoalId);
      $('history-empty').hidden = hasGoal;
      $('history-content').hidden = !hasGoal;
      if (!hasGoal) {
        return;
      }
      const url = `/api/goals/${encodeURIComponent(historyGoalId)}/history?mode=${historyMode}&date=${historyDate}`;
      renderHistory(await api('GET', url));
    };

    const showTab = (tab) => {
      document.querySelectorAll('.tabs button[data-tab]').forEach((button) =>
        button.classList.toggle('active', button.dataset.tab === tab));
      document.querySelectorAll('.tab-content').forEach((section) =>
        section.classList.toggle('active', section.id === `${tab}-tab`));
    };

    const exportData = () => {
      const link = document.createElement('a');
      link.href = '/api/export';
      document.body.appendChild(link);
      link.click();
      document.body.removeChild(link);
      toast('Backup exported');
    };

    const importData = async (file) => {
      try {
        const text = await file.text();
        const summary = await api('POST', '/api/import/preview', text, true);
        if (!confirm(summary.message)) {
          return;
        }
        await api('POST', '/api/import', text, true);
        historyGoalId = null;
        $('settings-overlay').classList.remove('active');
        await loadDay(selectedDate);
        await loadHistory();
        toast('Backup imported');
      } catch (err) {
        toast('Could not read the backup file', 'error');
      }
    };

    const wipeData = async () => {
      const first = confirm({{WIPE_PROMPT}});
      if (!first) {
        return;
      }
      const second = confirm({{WIPE_FINAL_PROMPT}});
      if (!second) {
        return;
      }
      try {
        await api('POST', '/api/data/wipe', { confirm: first, confirm_final: second });
        historyGoalId = null;
        $('settings-overlay').classList.remove('active');
        await loadDay(selectedDate);
        await loadHistory();
        toast('All data deleted');
      } catch (err) {
        toast(err.message, 'error');
      }
    };

    document.querySelectorAll('.tabs button[data-tab]').forEach((button) =>
      button.addEventListener('click', () => showTab(button.dataset.tab)));
    $('prev-day').addEventListener('click', (event) =>
      loadDay(event.target.dataset.date).catch((err) => toast(err.message, 'error')));
    $('next-day').addEventListener('click', (event) =>
      loadDay(event.target.dataset.date).catch((err) => toast(err.message, 'error')));
    $('add-goal-btn').addEventListener('click', () => openGoalForm(null));
    $('goal-cancel').addEventListener('click', closeGoalForm);
    $('goal-type').addEventListener('change', syncTargetField);
    $('history-goal').addEventListener('change', (event) => {
      historyGoalId = event.target.value || null;
      loadHistory().catch((err) => toast(err.message, 'error'));
    });
    document.querySelectorAll('.view-mode').forEach((button) => button.addEventListener('click', () => {
      document.querySelectorAll('.view-mode').forEach((other) => other.classList.toggle('active', other === button));
      historyMode = button.dataset.mode;
      loadHistory().catch((err) => toast(err.message, 'error'));
    }));
    $('prev-period').addEventListener('click', (event) => {
      historyDate = event.target.dataset.date || historyDate;
      loadHistory().catch((err) => toast(err.message, 'error'));
    });
    $('next-period').addEventListener('click', (event) => {
      historyDate = event.target.dataset.date || historyDate;
      loadHistory().catch((err) => toast(err.message, 'error'));
    });
    $('settings-btn').addEventListener('click', () => $('settings-overlay').classList.add('active'));
    $('settings-close').addEventListener('click', () => $('settings-overlay').classList.remove('active'));
    $('export-btn').addEventListener('click', exportData);
    $('import-btn').addEventListener('click', () => $('import-file').click());
    $('import-file').addEventListener('change', (event) => {
      const file = event.target.files[0];
      if (file) {
        importData(file);
        event.target.value = '';
      }
    });
    $('wipe-btn').addEventListener('click', wipeData);

    loadDay(selectedDate).catch((err) => toast(err.message, 'error'));
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_embeds_today() {
        let today = DateKey::parse("2026-10-17").unwrap();
        let html = render_index(today);
        assert!(html.contains("let selectedDate = '2026-10-17';"));
        assert!(html.contains("2026/10/17 (Sat)"));
        assert!(!html.contains("{{TODAY"));
    }

    #[test]
    fn index_asks_the_store_wipe_prompts() {
        let html = render_index(DateKey::parse("2026-10-17").unwrap());
        assert!(html.contains(&format!("confirm({})", js_string(WIPE_PROMPT))));
        assert!(html.contains(&format!("confirm({})", js_string(WIPE_FINAL_PROMPT))));
        assert!(html.contains("confirm(summary.message)"));
        assert!(html.contains("This cannot be undone."));
        assert!(!html.contains("{{WIPE"));
    }

    #[test]
    fn prompt_literals_escape_quotes_and_newlines() {
        assert_eq!(js_string("it's\n\"done\""), r#""it's\n\"done\"""#);
    }
}
